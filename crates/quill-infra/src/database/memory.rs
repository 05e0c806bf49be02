//! In-memory entity store - used when no database is configured, and in tests.
//!
//! Mirrors the PostgreSQL schema: ids come from per-table sequences, emails
//! are unique, posts must reference an existing user and are deleted with it.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use quill_core::domain::{NewPost, NewUser, Page, PageRequest, Post, SortDirection, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    user_seq: i64,
    post_seq: i64,
}

/// Shared tables behind both in-memory repositories.
///
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn user_repository(self: &Arc<Self>) -> InMemoryUserRepository {
        InMemoryUserRepository {
            store: Arc::clone(self),
        }
    }

    pub fn post_repository(self: &Arc<Self>) -> InMemoryPostRepository {
        InMemoryPostRepository {
            store: Arc::clone(self),
        }
    }

    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }

    pub async fn post_count(&self) -> usize {
        self.tables.read().await.posts.len()
    }
}

type Comparator<T> = fn(&T, &T) -> Ordering;

/// Attributes a row can be ordered by, in snake_case or camelCase.
trait Sortable: Clone {
    fn id(&self) -> i64;

    fn comparator(field: &str) -> Option<Comparator<Self>>;
}

impl Sortable for User {
    fn id(&self) -> i64 {
        self.id
    }

    fn comparator(field: &str) -> Option<Comparator<Self>> {
        let compare: Comparator<Self> = match field {
            "id" => |a, b| a.id.cmp(&b.id),
            "email" => |a, b| a.email.cmp(&b.email),
            "name" => |a, b| a.name.cmp(&b.name),
            "surname" => |a, b| a.surname.cmp(&b.surname),
            "created_at" | "createdAt" => |a, b| a.created_at.cmp(&b.created_at),
            _ => return None,
        };
        Some(compare)
    }
}

impl Sortable for Post {
    fn id(&self) -> i64 {
        self.id
    }

    fn comparator(field: &str) -> Option<Comparator<Self>> {
        let compare: Comparator<Self> = match field {
            "id" => |a, b| a.id.cmp(&b.id),
            "user_id" | "userId" => |a, b| a.user_id.cmp(&b.user_id),
            "title" => |a, b| a.title.cmp(&b.title),
            "content" => |a, b| a.content.cmp(&b.content),
            "created_at" | "createdAt" => |a, b| a.created_at.cmp(&b.created_at),
            "updated_at" | "updatedAt" => |a, b| a.updated_at.cmp(&b.updated_at),
            _ => return None,
        };
        Some(compare)
    }
}

/// Sort by the requested attribute, break ties by id, then cut the window.
fn paginate<'a, T>(
    rows: impl Iterator<Item = &'a T>,
    request: &PageRequest,
) -> Result<Page<T>, RepoError>
where
    T: Sortable + 'a,
{
    let compare = T::comparator(&request.sort_by)
        .ok_or_else(|| RepoError::InvalidSort(request.sort_by.clone()))?;

    let mut rows: Vec<T> = rows.cloned().collect();
    rows.sort_by(|a, b| {
        let ordering = match request.direction {
            SortDirection::Asc => compare(a, b),
            SortDirection::Desc => compare(b, a),
        };
        ordering.then_with(|| a.id().cmp(&b.id()))
    });

    let total = rows.len() as u64;
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let size = usize::try_from(request.size).unwrap_or(usize::MAX);
    let items = rows.into_iter().skip(offset).take(size).collect();

    Ok(Page::new(items, request, total))
}

fn contains_keyword(post: &Post, keyword: &str) -> bool {
    post.title.contains(keyword) || post.content.contains(keyword)
}

fn duplicate_email(email: &str) -> RepoError {
    RepoError::Constraint(format!("duplicate key value violates unique constraint on email: {email}"))
}

fn missing_owner(user_id: i64) -> RepoError {
    RepoError::Constraint(format!("posts.user_id references missing user {user_id}"))
}

/// In-memory user repository.
pub struct InMemoryUserRepository {
    store: Arc<InMemoryStore>,
}

#[async_trait]
impl BaseRepository<User, NewUser, i64> for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.store.tables.read().await.users.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        Ok(self.store.tables.read().await.users.values().cloned().collect())
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<User>, RepoError> {
        let tables = self.store.tables.read().await;
        paginate(tables.users.values(), request)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, RepoError> {
        Ok(self.store.tables.read().await.users.contains_key(&id))
    }

    async fn insert(&self, entity: NewUser) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.users.values().any(|u| u.email == entity.email) {
            return Err(duplicate_email(&entity.email));
        }

        tables.user_seq += 1;
        let user = User {
            id: tables.user_seq,
            email: entity.email,
            name: entity.name,
            surname: entity.surname,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());

        tracing::debug!(user_id = user.id, "Inserted user");
        Ok(user)
    }

    async fn update(&self, entity: User) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.users.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }
        if tables
            .users
            .values()
            .any(|u| u.id != entity.id && u.email == entity.email)
        {
            return Err(duplicate_email(&entity.email));
        }

        tables.users.insert(entity.id, entity.clone());
        Ok(entity)
    }

    /// Cascades to the user's posts.
    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }

        tables.posts.retain(|_, post| post.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.values().any(|u| u.email == email))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }
}

/// In-memory post repository.
pub struct InMemoryPostRepository {
    store: Arc<InMemoryStore>,
}

#[async_trait]
impl BaseRepository<Post, NewPost, i64> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.store.tables.read().await.posts.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.store.tables.read().await.posts.values().cloned().collect())
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        paginate(tables.posts.values(), request)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, RepoError> {
        Ok(self.store.tables.read().await.posts.contains_key(&id))
    }

    async fn insert(&self, entity: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.users.contains_key(&entity.user_id) {
            return Err(missing_owner(entity.user_id));
        }

        tables.post_seq += 1;
        let now = Utc::now();
        let post = Post {
            id: tables.post_seq,
            user_id: entity.user_id,
            title: entity.title,
            content: entity.content,
            created_at: now,
            updated_at: now,
        };
        tables.posts.insert(post.id, post.clone());

        tracing::debug!(post_id = post.id, "Inserted post");
        Ok(post)
    }

    async fn update(&self, mut entity: Post) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.posts.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }
        if !tables.users.contains_key(&entity.user_id) {
            return Err(missing_owner(entity.user_id));
        }

        entity.updated_at = Utc::now();
        tables.posts.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        match tables.posts.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .posts
            .values()
            .filter(|post| post.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_page_by_user_id(
        &self,
        user_id: i64,
        request: &PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        paginate(
            tables.posts.values().filter(|post| post.user_id == user_id),
            request,
        )
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .posts
            .values()
            .filter(|post| contains_keyword(post, keyword))
            .cloned()
            .collect())
    }

    async fn search_page(
        &self,
        keyword: &str,
        request: &PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        paginate(
            tables.posts.values().filter(|post| contains_keyword(post, keyword)),
            request,
        )
    }
}
