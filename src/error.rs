//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::auth::password::PasswordError;

/// A request body or path parameter that could not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error(transparent)]
    Body(#[from] JsonRejection),

    #[error(transparent)]
    Path(#[from] PathRejection),
}

/// Failure while storing or checking user credentials.
#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Connection Errors**: pool acquisition or session setup failed
/// - **Query Errors**: a statement failed at the database
/// - **Authentication Errors**: unknown username or wrong password
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No connection could be checked out of the pool.
    #[error("Database connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// A connection was acquired but its session settings failed.
    #[error("Database connection error: {0}")]
    SessionSetup(#[source] sqlx::Error),

    /// A handler ran without a live request connection.
    ///
    /// Happens when a route is mounted outside the connection middleware
    /// or runs after the middleware already released the lease.
    #[error("Database connection error: no connection attached to request")]
    ConnectionUnavailable,

    /// Returns HTTP 500 with the underlying message.
    #[error("Registration failed: {0}")]
    Registration(#[source] UserStoreError),

    /// Returns HTTP 500 with the underlying message.
    #[error("Log-in failed: {0}")]
    LogIn(#[source] UserStoreError),

    /// Returns HTTP 404 Not Found.
    #[error("Username not found")]
    UsernameNotFound,

    /// Returns HTTP 401 Unauthorized.
    #[error("Password is wrong")]
    WrongPassword,

    /// A car request whose body or path could not be parsed.
    #[error("Internal Server Error: {0}")]
    InvalidInput(#[from] InputError),

    /// Any other statement failure.
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, so handlers
    /// can use `?` directly on queries.
    #[error("Internal Server Error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UsernameNotFound => StatusCode::NOT_FOUND,
            AppError::WrongPassword => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing summary placed in the `error` field.
    fn summary(&self) -> &'static str {
        match self {
            AppError::Connection(_) | AppError::SessionSetup(_) | AppError::ConnectionUnavailable => {
                "Database connection error"
            }
            AppError::Registration(_) => "Registration failed",
            AppError::LogIn(_) => "Log-in failed",
            AppError::UsernameNotFound => "Username not found",
            AppError::WrongPassword => "Password is wrong",
            AppError::InvalidInput(_) | AppError::Database(_) => "Internal Server Error",
        }
    }

    /// Underlying message placed in the `details` field, if any.
    fn details(&self) -> Option<String> {
        match self {
            AppError::Connection(err) | AppError::SessionSetup(err) | AppError::Database(err) => {
                Some(err.to_string())
            }
            AppError::ConnectionUnavailable => {
                Some("no connection attached to request".to_string())
            }
            AppError::InvalidInput(err) => Some(err.to_string()),
            AppError::Registration(err) | AppError::LogIn(err) => Some(err.to_string()),
            AppError::UsernameNotFound | AppError::WrongPassword => None,
        }
    }

    /// JSON body sent to the client.
    pub fn body(&self) -> Value {
        match self.details() {
            Some(details) => json!({ "error": self.summary(), "details": details }),
            None => json!({ "error": self.summary() }),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// ```json
/// {
///   "error": "Internal Server Error",
///   "details": "error returned from database: ..."
/// }
/// ```
///
/// `details` is omitted for authentication failures.
///
/// # Status Code Mapping
///
/// - `UsernameNotFound` → 404 Not Found
/// - `WrongPassword` → 401 Unauthorized
/// - everything else → 500 Internal Server Error
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }

        (status, Json(self.body())).into_response()
    }
}
