//! User lifecycle and the email uniqueness rule.

use std::sync::Arc;

use quill_shared::PageResponse;
use quill_shared::dto::{UserRequest, UserResponse};

use super::{mask_email, page_view};
use crate::domain::{NewUser, PageRequest, User};
use crate::error::{DomainError, DomainResult};
use crate::ports::UserRepository;

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    #[tracing::instrument(level = "debug", skip(self), err(Display))]
    pub async fn list_users(&self) -> DomainResult<Vec<UserResponse>> {
        let users = self.users.find_all().await?;
        tracing::debug!(count = users.len(), "Listed users");
        Ok(users.iter().map(to_view).collect())
    }

    #[tracing::instrument(
        level = "debug",
        skip(self, request),
        fields(page = request.page, size = request.size, sort_by = %request.sort_by),
        err(Display)
    )]
    pub async fn list_users_page(
        &self,
        request: &PageRequest,
    ) -> DomainResult<PageResponse<UserResponse>> {
        let page = self.users.find_page(request).await?;
        Ok(page_view(page.map(|user| to_view(&user))))
    }

    #[tracing::instrument(level = "debug", skip(self), err(Display))]
    pub async fn get_user(&self, id: i64) -> DomainResult<UserResponse> {
        self.users
            .find_by_id(id)
            .await?
            .map(|user| to_view(&user))
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    #[tracing::instrument(skip(self, request), fields(email = %mask_email(&request.email)), err(Display))]
    pub async fn create_user(&self, request: UserRequest) -> DomainResult<UserResponse> {
        if self.users.exists_by_email(&request.email).await? {
            tracing::warn!("Email address already in use");
            return Err(email_taken(&request.email));
        }

        let user = self
            .users
            .insert(NewUser::new(request.email, request.name, request.surname))
            .await?;

        tracing::info!(user_id = user.id, "User created");
        Ok(to_view(&user))
    }

    #[tracing::instrument(skip(self, request), fields(email = %mask_email(&request.email)), err(Display))]
    pub async fn update_user(&self, id: i64, request: UserRequest) -> DomainResult<UserResponse> {
        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        if user.email != request.email && self.users.exists_by_email(&request.email).await? {
            tracing::warn!("Email address already in use");
            return Err(email_taken(&request.email));
        }

        user.email = request.email;
        user.name = request.name;
        user.surname = request.surname;

        let user = self.users.update(user).await?;
        tracing::info!(user_id = user.id, "User updated");
        Ok(to_view(&user))
    }

    /// Hard delete. The store cascades the delete to the user's posts.
    #[tracing::instrument(skip(self), err(Display))]
    pub async fn delete_user(&self, id: i64) -> DomainResult<()> {
        if !self.users.exists_by_id(id).await? {
            return Err(DomainError::user_not_found(id));
        }

        self.users.delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}

fn email_taken(email: &str) -> DomainError {
    DomainError::BadRequest(format!("Email address is already in use: {email}"))
}

fn to_view(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        surname: user.surname.clone(),
        created_at: user.created_at,
    }
}
