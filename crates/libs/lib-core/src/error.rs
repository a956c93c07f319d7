//! # Centralized Error Handling
//!
//! [`AppError`] is the single error type shared by the store, the session
//! services, and the HTTP handlers.
//!
//! ## Error Categories
//!
//! 1. **Client Errors** (4xx)
//!    - [`InvalidInput`](AppError::InvalidInput) → 400 Bad Request
//!    - [`InvalidCredentials`](AppError::InvalidCredentials) / [`Unauthorized`](AppError::Unauthorized) → 401
//!    - [`Forbidden`](AppError::Forbidden) → 403
//!    - [`NotFound`](AppError::NotFound) → 404
//!    - [`DuplicateEmail`](AppError::DuplicateEmail) → 409 Conflict
//!    - [`RateLimited`](AppError::RateLimited) → 429 Too Many Requests
//!
//! 2. **Server Errors** (5xx)
//!    - [`Config`](AppError::Config) → 500, deployment misconfiguration
//!    - [`Database`](AppError::Database) / [`Internal`](AppError::Internal) → 500
//!
//! Server errors never leak their detail to clients: the response carries a
//! generic message and the detail goes to the log. Authentication failures
//! use one message regardless of which check failed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::dto::ErrorResponse;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error (missing signing secret, bad env value).
    ///
    /// **HTTP Status**: 500 Internal Server Error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Registration with an email that already has an account.
    ///
    /// **HTTP Status**: 409 Conflict
    #[error("Email already in use")]
    DuplicateEmail,

    /// Email/password pair did not authenticate. Never says which part was wrong.
    ///
    /// **HTTP Status**: 401 Unauthorized
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Too many attempts from this caller in the current window.
    ///
    /// **HTTP Status**: 429 Too Many Requests
    #[error("Rate limited")]
    RateLimited,

    /// No valid session.
    ///
    /// **HTTP Status**: 401 Unauthorized
    #[error("Not authenticated")]
    Unauthorized,

    /// Authenticated (or not) but not allowed to perform the operation.
    ///
    /// **HTTP Status**: 403 Forbidden
    #[error("Forbidden")]
    Forbidden,

    /// Invalid user input validation error.
    ///
    /// **HTTP Status**: 400 Bad Request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested resource not found.
    ///
    /// **HTTP Status**: 404 Not Found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credential/data store failure. Propagated as-is, never retried.
    ///
    /// **HTTP Status**: 500 Internal Server Error
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error (unexpected failures).
    ///
    /// **HTTP Status**: 500 Internal Server Error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Config(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "Config",
            AppError::DuplicateEmail => "DuplicateEmail",
            AppError::InvalidCredentials => "InvalidCredentials",
            AppError::RateLimited => "RateLimited",
            AppError::Unauthorized => "Unauthorized",
            AppError::Forbidden => "Forbidden",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::NotFound(_) => "NotFound",
            AppError::Database(_) => "Database",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Get a user-facing error message.
    ///
    /// For server errors, returns a generic message to avoid exposing implementation details.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::DuplicateEmail => "Email already in use".to_string(),
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::RateLimited => "Too many attempts. Try again later.".to_string(),
            AppError::Unauthorized => "Not authenticated".to_string(),
            AppError::Forbidden => "Not authorized".to_string(),
            AppError::Config(_) | AppError::Database(_) | AppError::Internal(_) => {
                "An internal error occurred".to_string()
            }
        }
    }
}

/// Implement Axum's `IntoResponse` for automatic error handling.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Full detail for server logs only
        if status.is_server_error() {
            tracing::error!("Server error: {}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        let body = Json(ErrorResponse {
            message: self.user_message(),
            code: self.error_code().to_string(),
        });

        (status, body).into_response()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Convert `sqlx::Error` to `AppError`.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Database record not found".to_string()),
            sqlx::Error::Database(db_err) => AppError::Database(db_err.message().to_string()),
            _ => AppError::Database(err.to_string()),
        }
    }
}

/// Convert `serde_json::Error` to `AppError`.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}

/// Convert authentication library errors.
impl From<lib_auth::Error> for AppError {
    fn from(err: lib_auth::Error) -> Self {
        match err {
            lib_auth::Error::MissingSecret | lib_auth::Error::InvalidTtl(_) => {
                AppError::Config(err.to_string())
            }
            lib_auth::Error::TokenInvalid(_) => AppError::Unauthorized,
            lib_auth::Error::PwdHash(_)
            | lib_auth::Error::TokenEncode(_)
            | lib_auth::Error::RateLimitStore(_) => AppError::Internal(err.to_string()),
        }
    }
}

/// Convert environment lookup errors (always a configuration problem).
impl From<lib_utils::envs::Error> for AppError {
    fn from(err: lib_utils::envs::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

/// A panicked or cancelled blocking task.
impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Background task failed: {}", err))
    }
}
