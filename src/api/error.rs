//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::store::StoreError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing, invalid, or expired session
    #[error("Authentication required")]
    Unauthorized,

    /// Entries store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Sign-in or session error
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "AUTH_REQUIRED"),
            ApiError::Store(StoreError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            ApiError::Store(StoreError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
            ApiError::Auth(AuthError::InvalidState) => (StatusCode::BAD_REQUEST, "INVALID_STATE"),
            ApiError::Auth(AuthError::Provider(_))
            | ApiError::Auth(AuthError::Http(_))
            | ApiError::Auth(AuthError::Parse(_)) => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR"),
            ApiError::Auth(_) => (StatusCode::INTERNAL_SERVER_ERROR, "AUTH_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        let request_id = uuid::Uuid::new_v4().to_string();

        // Log the error
        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "API error occurred"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = ApiError::Store(StoreError::NotFound(7)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response =
            ApiError::Store(StoreError::Validation("Title cannot be empty".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::Auth(AuthError::Provider("down".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
