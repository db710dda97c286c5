/// Unified error types for Argus ID
use crate::response::ServiceResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unknown identifier or wrong password, indistinguishable on purpose
    #[error("Incorrect username or password")]
    InvalidCredentials,

    /// Too many failed attempts, with remaining lockout minutes
    #[error("Account is locked due to too many failed attempts. Please try again in {0} minutes, or use 'Forgot Password' to reset your password.")]
    AccountLocked(i64),

    /// Registration conflict on the normalized email
    #[error("A user with this email already exists.")]
    DuplicateEmail,

    /// Registration conflict on the normalized username
    #[error("A user with this username already exists.")]
    DuplicateUsername,

    /// Refresh token unknown, expired, or already rotated
    #[error("Invalid or expired refresh token.")]
    InvalidRefreshToken,

    /// Reset token unknown, mismatched, expired, or already redeemed
    #[error("Invalid or expired reset token.")]
    InvalidResetToken,

    /// Validation errors (single message)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request shape validation errors, passed through as an error list
    #[error("One or more validation errors occurred.")]
    ValidationFailed(Vec<String>),

    /// Authentication errors (missing or bad bearer token)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert ApiError to an HTTP response carrying the standard wrapper
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::InvalidCredentials
            | ApiError::AccountLocked(_)
            | ApiError::DuplicateEmail
            | ApiError::DuplicateUsername
            | ApiError::InvalidRefreshToken
            | ApiError::InvalidResetToken
            | ApiError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                ServiceResponse::<()>::failure(self.to_string()),
            ),
            ApiError::ValidationFailed(errors) => (
                StatusCode::BAD_REQUEST,
                ServiceResponse::<()>::failure_with_errors(self.to_string(), errors.clone()),
            ),
            ApiError::Authentication(_) => (
                StatusCode::UNAUTHORIZED,
                ServiceResponse::<()>::failure(self.to_string()),
            ),
            // Pool exhaustion is transient; let the caller retry
            ApiError::Database(sqlx::Error::PoolTimedOut) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ServiceResponse::<()>::failure("Service temporarily unavailable, please retry."),
            ),
            ApiError::Database(_) | ApiError::Internal(_) | ApiError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                // Don't leak details
                ServiceResponse::<()>::failure("Internal server error"),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for service operations
pub type ApiResult<T> = Result<T, ApiError>;
