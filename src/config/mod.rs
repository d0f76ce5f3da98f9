//! Configuration management for the reel feed
//!
//! This module handles loading and managing configuration settings
//! for the server and the bootstrap tool.

pub mod loader;
pub mod settings;

pub use loader::{ConfigLoader, default_config_path};
pub use settings::{SessionBackend, Settings, StorageMode};
