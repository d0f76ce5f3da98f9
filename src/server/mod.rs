//! HTTP server
//!
//! Routes, handlers and the session cookie middleware.

pub mod app;
pub mod handlers;
pub mod middleware;

pub use app::{AppState, create_app};
