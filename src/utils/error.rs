//! Error Handling Utilities
//!
//! Application-wide error types and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type that can represent errors from any feature
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Validation errors for client input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication and authorization errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Resource not found errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Conflict errors (e.g., duplicate unique fields)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Password hashing errors
    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Generic internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Standard error response body for API endpoints
///
/// Failed requests always serialize to `{ "message": ... }` with the
/// status code carrying the error kind.
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Anything not an explicit client-facing kind maps to 500. Detail for
        // 5xx errors stays in the logs, not the response body.
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Database(err) => {
                log::error!("database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            AppError::Hashing(err) => {
                log::error!("password hashing error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
            AppError::Internal(msg) => {
                log::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(&message))).into_response()
    }
}

/// Result type alias for operations that can return AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn response_parts(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_error_response_creation() {
        let error = ErrorResponse::new("Test message");
        assert_eq!(error.message, "Test message");
    }

    #[test]
    fn test_app_error_display() {
        let error = AppError::Validation("Invalid email".to_string());
        assert_eq!(error.to_string(), "Validation error: Invalid email");
    }

    #[tokio::test]
    async fn test_client_errors_keep_their_message() {
        let (status, body) = response_parts(AppError::NotFound("Product not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Product not found");

        let (status, _) = response_parts(AppError::Conflict("Name already exists".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = response_parts(AppError::Validation("bad input".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = response_parts(AppError::Authentication("no token".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_internal_errors_are_redacted() {
        let (status, body) =
            response_parts(AppError::Internal("connection pool exhausted".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "An internal server error occurred");
    }
}
