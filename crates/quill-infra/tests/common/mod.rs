//! Shared fixtures: services over the in-memory store, with write counters.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use quill_core::domain::{NewPost, NewUser, Page, PageRequest, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository, UserRepository};
use quill_core::{PostService, UserService};
use quill_infra::{InMemoryPostRepository, InMemoryStore, InMemoryUserRepository};
use quill_shared::dto::{PostRequest, UserRequest};

/// Counts the write calls that reach the wrapped repository.
#[derive(Default)]
pub struct WriteLog {
    inserts: AtomicUsize,
    updates: AtomicUsize,
    deletes: AtomicUsize,
}

impl WriteLog {
    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

pub struct Counted<R> {
    inner: R,
    log: Arc<WriteLog>,
}

#[async_trait]
impl BaseRepository<User, NewUser, i64> for Counted<InMemoryUserRepository> {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        self.inner.find_all().await
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<User>, RepoError> {
        self.inner.find_page(request).await
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, RepoError> {
        self.inner.exists_by_id(id).await
    }

    async fn insert(&self, entity: NewUser) -> Result<User, RepoError> {
        self.log.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(entity).await
    }

    async fn update(&self, entity: User) -> Result<User, RepoError> {
        self.log.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(entity).await
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.log.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(id).await
    }
}

#[async_trait]
impl UserRepository for Counted<InMemoryUserRepository> {
    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
        self.inner.exists_by_email(email).await
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, RepoError> {
        self.inner.find_by_ids(ids).await
    }
}

#[async_trait]
impl BaseRepository<Post, NewPost, i64> for Counted<InMemoryPostRepository> {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        self.inner.find_all().await
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<Post>, RepoError> {
        self.inner.find_page(request).await
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, RepoError> {
        self.inner.exists_by_id(id).await
    }

    async fn insert(&self, entity: NewPost) -> Result<Post, RepoError> {
        self.log.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(entity).await
    }

    async fn update(&self, entity: Post) -> Result<Post, RepoError> {
        self.log.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(entity).await
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.log.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(id).await
    }
}

#[async_trait]
impl PostRepository for Counted<InMemoryPostRepository> {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Post>, RepoError> {
        self.inner.find_by_user_id(user_id).await
    }

    async fn find_page_by_user_id(
        &self,
        user_id: i64,
        request: &PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        self.inner.find_page_by_user_id(user_id, request).await
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Post>, RepoError> {
        self.inner.search(keyword).await
    }

    async fn search_page(
        &self,
        keyword: &str,
        request: &PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        self.inner.search_page(keyword, request).await
    }
}

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub users: UserService,
    pub posts: PostService,
    pub user_writes: Arc<WriteLog>,
    pub post_writes: Arc<WriteLog>,
}

impl Harness {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let user_writes = Arc::new(WriteLog::default());
        let post_writes = Arc::new(WriteLog::default());

        let user_repo: Arc<dyn UserRepository> = Arc::new(Counted {
            inner: store.user_repository(),
            log: Arc::clone(&user_writes),
        });
        let post_repo: Arc<dyn PostRepository> = Arc::new(Counted {
            inner: store.post_repository(),
            log: Arc::clone(&post_writes),
        });

        Self {
            users: UserService::new(Arc::clone(&user_repo)),
            posts: PostService::new(post_repo, user_repo),
            store,
            user_writes,
            post_writes,
        }
    }
}

pub fn user_request(email: &str, name: &str, surname: &str) -> UserRequest {
    UserRequest {
        email: email.to_string(),
        name: name.to_string(),
        surname: surname.to_string(),
    }
}

pub fn post_request(title: &str, content: &str, user_id: Option<i64>) -> PostRequest {
    PostRequest {
        title: title.to_string(),
        content: content.to_string(),
        user_id,
    }
}
