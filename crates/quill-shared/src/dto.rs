//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{self, Validate, ValidationErrors};

/// Request to create or update a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
}

impl Validate for UserRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if validation::not_blank(&mut errors, "email", &self.email) {
            validation::email(&mut errors, "email", &self.email);
        }
        if validation::not_blank(&mut errors, "name", &self.name) {
            validation::length_between(&mut errors, "name", &self.name, 2, Some(50));
        }
        if validation::not_blank(&mut errors, "surname", &self.surname) {
            validation::length_between(&mut errors, "surname", &self.surname, 2, Some(50));
        }

        errors.into_result()
    }
}

/// Request to create or update a post.
///
/// `user_id` is required on creation and ignored on update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl PostRequest {
    /// Validation for the create path, where the owner is mandatory.
    pub fn validate_for_create(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_default();
        if self.user_id.is_none() {
            errors.add("userId", "userId must not be null");
        }
        errors.into_result()
    }
}

impl Validate for PostRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if validation::not_blank(&mut errors, "title", &self.title) {
            validation::length_between(&mut errors, "title", &self.title, 3, Some(200));
        }
        if validation::not_blank(&mut errors, "content", &self.content) {
            validation::length_between(&mut errors, "content", &self.content, 10, None);
        }

        errors.into_result()
    }
}

/// A user's public information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub created_at: DateTime<Utc>,
}

/// A post with its owner's display name resolved at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub user_id: i64,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
