//! Post lifecycle. Every post must be owned by an existing user.

use std::collections::HashMap;
use std::sync::Arc;

use quill_shared::PageResponse;
use quill_shared::dto::{PostRequest, PostResponse};

use super::page_view;
use crate::domain::{NewPost, Page, PageRequest, Post, User};
use crate::error::{DomainError, DomainResult, RepoError};
use crate::ports::{PostRepository, UserRepository};

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    #[tracing::instrument(level = "debug", skip(self), err(Display))]
    pub async fn list_posts(&self) -> DomainResult<Vec<PostResponse>> {
        let posts = self.posts.find_all().await?;
        self.views(posts).await
    }

    #[tracing::instrument(
        level = "debug",
        skip(self, request),
        fields(page = request.page, size = request.size, sort_by = %request.sort_by),
        err(Display)
    )]
    pub async fn list_posts_page(
        &self,
        request: &PageRequest,
    ) -> DomainResult<PageResponse<PostResponse>> {
        let page = self.posts.find_page(request).await?;
        self.page_views(page).await
    }

    #[tracing::instrument(level = "debug", skip(self), err(Display))]
    pub async fn get_post(&self, id: i64) -> DomainResult<PostResponse> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))?;

        let owner = self.owner_of(&post).await?;
        Ok(to_view(post, &owner))
    }

    #[tracing::instrument(level = "debug", skip(self), err(Display))]
    pub async fn list_posts_by_user(&self, user_id: i64) -> DomainResult<Vec<PostResponse>> {
        self.ensure_user_exists(user_id).await?;
        let posts = self.posts.find_by_user_id(user_id).await?;
        self.views(posts).await
    }

    #[tracing::instrument(
        level = "debug",
        skip(self, request),
        fields(page = request.page, size = request.size, sort_by = %request.sort_by),
        err(Display)
    )]
    pub async fn list_posts_by_user_page(
        &self,
        user_id: i64,
        request: &PageRequest,
    ) -> DomainResult<PageResponse<PostResponse>> {
        self.ensure_user_exists(user_id).await?;
        let page = self.posts.find_page_by_user_id(user_id, request).await?;
        self.page_views(page).await
    }

    #[tracing::instrument(level = "debug", skip(self), err(Display))]
    pub async fn search_posts(&self, keyword: &str) -> DomainResult<Vec<PostResponse>> {
        let posts = self.posts.search(keyword).await?;
        tracing::debug!(matches = posts.len(), "Searched posts");
        self.views(posts).await
    }

    #[tracing::instrument(
        level = "debug",
        skip(self, request),
        fields(page = request.page, size = request.size, sort_by = %request.sort_by),
        err(Display)
    )]
    pub async fn search_posts_page(
        &self,
        keyword: &str,
        request: &PageRequest,
    ) -> DomainResult<PageResponse<PostResponse>> {
        let page = self.posts.search_page(keyword, request).await?;
        self.page_views(page).await
    }

    #[tracing::instrument(skip(self, request), fields(title = %request.title), err(Display))]
    pub async fn create_post(&self, request: PostRequest) -> DomainResult<PostResponse> {
        let user_id = request
            .user_id
            .ok_or_else(|| DomainError::Validation(vec!["userId must not be null".into()]))?;

        let owner = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(user_id))?;

        let post = self
            .posts
            .insert(NewPost::new(owner.id, request.title, request.content))
            .await?;

        tracing::info!(post_id = post.id, user_id, "Post created");
        Ok(to_view(post, &owner))
    }

    /// Overwrites title and content. The owner never changes, whatever the
    /// request carries in `user_id`.
    #[tracing::instrument(skip(self, request), err(Display))]
    pub async fn update_post(&self, id: i64, request: PostRequest) -> DomainResult<PostResponse> {
        let mut post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))?;

        post.title = request.title;
        post.content = request.content;

        let post = self.posts.update(post).await?;
        let owner = self.owner_of(&post).await?;

        tracing::info!(post_id = post.id, "Post updated");
        Ok(to_view(post, &owner))
    }

    #[tracing::instrument(skip(self), err(Display))]
    pub async fn delete_post(&self, id: i64) -> DomainResult<()> {
        if !self.posts.exists_by_id(id).await? {
            return Err(DomainError::post_not_found(id));
        }

        self.posts.delete(id).await?;
        tracing::info!(post_id = id, "Post deleted");
        Ok(())
    }

    async fn ensure_user_exists(&self, user_id: i64) -> DomainResult<()> {
        if self.users.exists_by_id(user_id).await? {
            Ok(())
        } else {
            Err(DomainError::user_not_found(user_id))
        }
    }

    async fn owner_of(&self, post: &Post) -> DomainResult<User> {
        self.users
            .find_by_id(post.user_id)
            .await?
            .ok_or_else(|| dangling_owner(post))
    }

    /// Resolves all owners with one batch read.
    async fn views(&self, posts: Vec<Post>) -> DomainResult<Vec<PostResponse>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let mut owner_ids: Vec<i64> = posts.iter().map(|post| post.user_id).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();

        let owners: HashMap<i64, User> = self
            .users
            .find_by_ids(&owner_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        posts
            .into_iter()
            .map(|post| match owners.get(&post.user_id) {
                Some(owner) => Ok(to_view(post, owner)),
                None => Err(dangling_owner(&post)),
            })
            .collect()
    }

    async fn page_views(&self, page: Page<Post>) -> DomainResult<PageResponse<PostResponse>> {
        let Page {
            items,
            page,
            size,
            total_elements,
        } = page;
        let items = self.views(items).await?;

        Ok(page_view(Page {
            items,
            page,
            size,
            total_elements,
        }))
    }
}

// Only reachable if the store lets a post outlive its owner.
fn dangling_owner(post: &Post) -> DomainError {
    DomainError::Unexpected(RepoError::Constraint(format!(
        "post {} references missing user {}",
        post.id, post.user_id
    )))
}

fn to_view(post: Post, owner: &User) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        user_id: post.user_id,
        user_name: owner.full_name(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}
