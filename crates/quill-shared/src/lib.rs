//! # Quill Shared
//!
//! Wire shapes shared by the services and the HTTP adapter: request DTOs,
//! response views and the response envelope.

pub mod dto;
pub mod response;
pub mod validation;

pub use response::{ApiResponse, PageResponse};
pub use validation::{Validate, ValidationErrors};
