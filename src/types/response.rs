//! Response type definitions
//!
//! Every endpoint answers with an envelope carrying a `success` flag and
//! either the flattened payload fields or an `error` message.

use crate::types::{ListingSource, Reel};
use serde::{Deserialize, Serialize};

/// Successful response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload in a successful envelope
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Error response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Error message
    pub error: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Quota summary embedded in the reel listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerStatus {
    pub is_logged_in: bool,
    pub views_count: u32,
    /// `None` means unlimited
    pub views_remaining: Option<u32>,
}

/// Payload of `GET /api/reels`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelsPayload {
    pub reels: Vec<Reel>,
    pub count: usize,
    pub source: ListingSource,
    pub user: ViewerStatus,
}

/// Public view of an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Payload of register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountPayload {
    pub message: String,
    pub user: AccountSummary,
}

/// Identity stored in a logged-in session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
}

/// Payload of `GET /api/auth/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatusPayload {
    pub is_logged_in: bool,
    pub user: Option<SessionUser>,
    pub views_count: u32,
    pub views_remaining: Option<u32>,
}

/// Payload carrying only a human-readable message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePayload {
    pub message: String,
}

impl MessagePayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Payload of `POST /api/reels`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelCreatedPayload {
    pub message: String,
    pub reel_id: i64,
}

/// Health check payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthPayload {
    /// Server uptime in seconds
    pub server_uptime: u64,
    /// Server version
    pub version: String,
}

impl HealthPayload {
    pub fn new(server_uptime: u64, version: impl Into<String>) -> Self {
        Self {
            server_uptime,
            version: version.into(),
        }
    }
}
