use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity - a persisted user. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Display name embedded in post views.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// A user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub surname: String,
}

impl NewUser {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        surname: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            surname: surname.into(),
        }
    }
}
