//! Version information

/// Crate version as declared in Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn get_version() -> &'static str {
    VERSION
}
