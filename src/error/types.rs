//! Error type definitions
//!
//! Defines the main error type used throughout the reel feed and its mapping
//! onto the uniform `{ success: false, error }` response envelope.

use crate::types::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Main error type for the reel feed
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed client input
    #[error("{0}")]
    Validation(String),

    /// Unique username or email already taken
    #[error("{0}")]
    Conflict(String),

    /// Credentials did not match, or the action needs a logged-in visitor
    #[error("{0}")]
    Authentication(String),

    /// Requested resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Route exists but not for this HTTP method
    #[error("{0}")]
    MethodNotAllowed(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Object storage errors (listing, signing)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Relational store errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a new authentication error
    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a new not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn method_not_allowed(msg: impl Into<String>) -> Self {
        Self::MethodNotAllowed(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// HTTP status the error is reported with.
    ///
    /// Conflicts share 400 with validation failures; the register endpoint
    /// only ever answers 201, 400 or 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::Conflict(_) => StatusCode::BAD_REQUEST,
            Error::Authentication(_) => StatusCode::UNAUTHORIZED,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Error::Config(_)
            | Error::Storage(_)
            | Error::Database(_)
            | Error::Json(_)
            | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the error envelope.
    ///
    /// Client errors carry their own text; infrastructure errors are masked.
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "An internal server error occurred".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(ErrorResponse::new(self.public_message()))).into_response()
    }
}
