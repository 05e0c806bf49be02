use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity - a persisted post owned by exactly one user.
///
/// `created_at` is set once on insert; `updated_at` is refreshed by the
/// store on every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub user_id: i64,
    pub title: String,
    pub content: String,
}

impl NewPost {
    pub fn new(user_id: i64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            content: content.into(),
        }
    }
}
