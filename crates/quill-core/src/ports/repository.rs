use async_trait::async_trait;

use crate::domain::{NewPost, NewUser, Page, PageRequest, Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
///
/// `T` is the stored entity, `N` its not-yet-stored form and `ID` the key.
/// Unpaged reads return store-native order (ascending id).
#[async_trait]
pub trait BaseRepository<T, N, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    async fn find_all(&self) -> Result<Vec<T>, RepoError>;

    /// One sorted window plus the total count over all entities.
    async fn find_page(&self, request: &PageRequest) -> Result<Page<T>, RepoError>;

    async fn exists_by_id(&self, id: ID) -> Result<bool, RepoError>;

    /// Store a new entity; the store assigns its id and timestamps.
    async fn insert(&self, entity: N) -> Result<T, RepoError>;

    /// Overwrite an existing entity in place.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, NewUser, i64> {
    /// Exact, case-sensitive email match.
    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError>;

    /// Batch lookup; missing ids are skipped.
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, NewPost, i64> {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Post>, RepoError>;

    async fn find_page_by_user_id(
        &self,
        user_id: i64,
        request: &PageRequest,
    ) -> Result<Page<Post>, RepoError>;

    /// Posts whose title or content contains `keyword`.
    async fn search(&self, keyword: &str) -> Result<Vec<Post>, RepoError>;

    async fn search_page(
        &self,
        keyword: &str,
        request: &PageRequest,
    ) -> Result<Page<Post>, RepoError>;
}
