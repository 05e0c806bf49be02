//! # Quill Core
//!
//! The domain layer of Quill.
//! Entities, the repository ports the storage layer implements, and the
//! user/post services that enforce the cross-entity rules.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::{DomainError, DomainResult, RepoError};
pub use service::{PostService, UserService};
