//! Type definitions for the reel feed
//!
//! This module contains the main data structures used for requests and responses.

pub mod reel;
pub mod request;
pub mod response;

pub use reel::{ListingSource, Reel, ReelListing, ReelOrigin};
pub use request::{AddReelRequest, LoginRequest, RegisterRequest};
pub use response::{
    AccountPayload, AccountSummary, ApiResponse, AuthStatusPayload, ErrorResponse, HealthPayload,
    MessagePayload, ReelCreatedPayload, ReelsPayload, SessionUser, ViewerStatus,
};
