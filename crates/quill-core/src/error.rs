//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures surfaced to the transport layer.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} not found with id {id}")]
    NotFound { entity_type: &'static str, id: i64 },

    #[error("{0}")]
    BadRequest(String),

    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// A store failure the service did not anticipate, passed through untouched.
    #[error(transparent)]
    Unexpected(RepoError),
}

impl DomainError {
    pub fn user_not_found(id: i64) -> Self {
        Self::NotFound {
            entity_type: "User",
            id,
        }
    }

    pub fn post_not_found(id: i64) -> Self {
        Self::NotFound {
            entity_type: "Post",
            id,
        }
    }
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::InvalidSort(field) => {
                Self::BadRequest(format!("Cannot sort by unknown field '{field}'"))
            }
            other => Self::Unexpected(other),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Unknown sort field: {0}")]
    InvalidSort(String),
}
