//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, Select};

use quill_core::domain::{Page, PageRequest, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
        let count = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.fetch_all(UserEntity::find().filter(user::Column::Id.is_in(ids.iter().copied())))
            .await
    }
}

fn owned_by(user_id: i64) -> Select<PostEntity> {
    PostEntity::find().filter(post::Column::UserId.eq(user_id))
}

/// Literal substring match on title or content; case-sensitive in PostgreSQL.
fn matching(keyword: &str) -> Select<PostEntity> {
    let pattern = format!("%{}%", escape_like(keyword));
    PostEntity::find().filter(
        Condition::any()
            .add(Expr::col((PostEntity, post::Column::Title)).like(LikeExpr::new(pattern.clone()).escape('\\')))
            .add(Expr::col((PostEntity, post::Column::Content)).like(LikeExpr::new(pattern).escape('\\'))),
    )
}

/// Backslash-escape the LIKE metacharacters so `%` and `_` match themselves.
pub(crate) fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Post>, RepoError> {
        tracing::debug!(user_id, "Finding posts by owner");
        self.fetch_all(owned_by(user_id)).await
    }

    async fn find_page_by_user_id(
        &self,
        user_id: i64,
        request: &PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        self.fetch_page(owned_by(user_id), request).await
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Post>, RepoError> {
        tracing::debug!(keyword, "Searching posts");
        self.fetch_all(matching(keyword)).await
    }

    async fn search_page(
        &self,
        keyword: &str,
        request: &PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        self.fetch_page(matching(keyword), request).await
    }
}
