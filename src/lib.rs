//! Reel Feed - short video feed server
//!
//! Serves a vertical feed of short videos from a local directory, an S3
//! bucket or a legacy catalog table. Anonymous visitors get a fixed number of
//! views before they are asked to register or log in.
//!
//! # Architecture
//!
//! - **Video source**: [`storage::VideoSource`] lists reels from the configured
//!   storage mode, falling back to the local directory when a bucket is
//!   unreachable or empty
//! - **Sessions**: a cookie-bound [`session::SessionStore`] holds identity and
//!   the anonymous view counter
//! - **Accounts**: [`accounts::AccountManager`] registers and authenticates
//!   users against the relational store
//!
//! # Usage
//!
//! ```bash
//! reel-feed --port 5000 --host 0.0.0.0
//! reel-feed-init --seed
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use reel_feed::{Settings, server::{AppState, create_app}};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let settings = Settings::default();
//! let state = AppState::build(settings).await?;
//! let app = create_app(state);
//! # Ok(())
//! # }
//! ```

pub mod accounts;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod server;
pub mod session;
pub mod storage;
pub mod types;
pub mod utils;

pub use config::Settings;
pub use error::{Error, Result};
pub use types::{ErrorResponse, Reel, ReelListing};
