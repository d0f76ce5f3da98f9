//! Request type definitions
//!
//! Bodies accepted by the account and catalog endpoints. Missing fields
//! deserialize to empty values so that validation, not the JSON extractor,
//! decides what is acceptable.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth/register`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterRequest {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Body of `POST /api/auth/login`
///
/// `username` holds either a username or an email address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: identifier.into(),
            password: password.into(),
        }
    }
}

/// Body of `POST /api/reels`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddReelRequest {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}
