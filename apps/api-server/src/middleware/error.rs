//! Error handling middleware - every failure leaves as an `ApiResponse` envelope.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use quill_core::error::DomainError;
use quill_shared::{ApiResponse, ValidationErrors};
use thiserror::Error;

/// Application-level error type that converts to enveloped JSON responses.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(ValidationErrors),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        match self {
            AppError::NotFound(message) | AppError::BadRequest(message) => {
                response.json(ApiResponse::<()>::error(message))
            }
            AppError::Validation(errors) => {
                response.json(ApiResponse::error_with_data("Validation failed", errors))
            }
            AppError::Internal(detail) => {
                // Details stay in the logs.
                tracing::error!("Internal error: {}", detail);
                response.json(ApiResponse::<()>::error("An unexpected error occurred"))
            }
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { .. } => AppError::NotFound(err.to_string()),
            DomainError::BadRequest(msg) => AppError::BadRequest(msg),
            DomainError::Validation(_) => AppError::BadRequest(err.to_string()),
            DomainError::Unexpected(repo) => AppError::Internal(repo.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use quill_core::error::RepoError;

    async fn body_of(err: AppError) -> serde_json::Value {
        let bytes = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn domain_errors_map_to_status_codes() {
        let not_found: AppError = DomainError::user_not_found(3).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let bad: AppError = DomainError::BadRequest("taken".into()).into();
        assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);

        let unexpected: AppError =
            DomainError::Unexpected(RepoError::Connection("refused".into())).into();
        assert_eq!(unexpected.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn not_found_body_is_enveloped() {
        let body = body_of(DomainError::post_not_found(9).into()).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Post not found with id 9");
        assert!(body.get("data").is_none());
    }

    #[actix_web::test]
    async fn internal_details_are_hidden() {
        let err: AppError = DomainError::Unexpected(RepoError::Query("syntax".into())).into();
        let body = body_of(err).await;
        assert_eq!(body["message"], "An unexpected error occurred");
    }

    #[actix_web::test]
    async fn validation_body_carries_field_map() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "must be a valid email address");
        let body = body_of(errors.into()).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["data"]["email"], "must be a valid email address");
    }
}
