//! Configuration settings structure
//!
//! Defines the main settings structure, environment overrides and validation
//! for the reel feed. The resulting [`Settings`] value is passed explicitly into
//! the application state; nothing reads configuration from globals.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Longest lifetime S3 accepts for a presigned URL (7 days)
pub const MAX_SIGNED_URL_EXPIRY_SECS: u64 = 604_800;

/// Main configuration settings for the reel feed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server configuration
    pub server: ServerSettings,
    /// Where reels are listed from
    pub storage: StorageSettings,
    /// Bucket configuration, used in bucket mode
    pub bucket: BucketSettings,
    /// Relational store configuration
    pub database: DatabaseSettings,
    /// Visitor session configuration
    pub session: SessionSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
}

/// Storage mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Enumerate a local directory
    Local,
    /// List objects under a bucket prefix, falling back to local
    #[serde(alias = "s3")]
    Bucket,
    /// Read the legacy reels table
    Catalog,
}

impl FromStr for StorageMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(StorageMode::Local),
            "bucket" | "s3" => Ok(StorageMode::Bucket),
            "catalog" | "database" => Ok(StorageMode::Catalog),
            other => Err(Error::config(format!("Invalid storage mode: {}", other))),
        }
    }
}

/// Reel source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub mode: StorageMode,
    /// Directory enumerated in local mode and served under `video_url_prefix`
    pub video_dir: PathBuf,
    /// URL path local videos are served from
    pub video_url_prefix: String,
}

/// Object storage configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketSettings {
    /// Bucket name
    pub name: String,
    /// Bucket region
    pub region: String,
    /// Key prefix videos live under
    pub prefix: String,
    /// Custom endpoint for S3-compatible stores
    pub endpoint_url: Option<String>,
    /// Base for stable public URLs; defaults to the virtual-hosted bucket URL
    pub public_base_url: Option<String>,
    /// Explicit credentials; the default AWS chain is used when absent
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Produce presigned URLs instead of public ones
    pub signed_urls: bool,
    /// Lifetime of presigned URLs in seconds
    pub signed_url_expiry_secs: u64,
    /// Page size requested from the listing API
    pub max_keys_per_page: i32,
}

// Hand-written so credentials never reach the logs.
impl std::fmt::Debug for BucketSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketSettings")
            .field("name", &self.name)
            .field("region", &self.region)
            .field("prefix", &self.prefix)
            .field("endpoint_url", &self.endpoint_url)
            .field("public_base_url", &self.public_base_url)
            .field(
                "access_key_id",
                &self.access_key_id.as_ref().map(|_| "<redacted>"),
            )
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("signed_urls", &self.signed_urls)
            .field("signed_url_expiry_secs", &self.signed_url_expiry_secs)
            .field("max_keys_per_page", &self.max_keys_per_page)
            .finish()
    }
}

/// Relational store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// sqlx connection URL
    pub url: String,
}

/// Session store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    Memory,
    Sqlite,
}

impl FromStr for SessionBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(SessionBackend::Memory),
            "sqlite" | "database" => Ok(SessionBackend::Sqlite),
            other => Err(Error::config(format!("Invalid session backend: {}", other))),
        }
    }
}

/// Visitor session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub backend: SessionBackend,
    /// Name of the cookie carrying the session token
    pub cookie_name: String,
    /// Mark the session cookie `Secure`
    pub secure_cookie: bool,
    /// Anonymous views allowed before login is required
    pub view_limit: u32,
    /// Seconds a session may go unsaved before it is discarded
    pub idle_ttl_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            mode: StorageMode::Local,
            video_dir: PathBuf::from("static/videos"),
            video_url_prefix: "/videos".to_string(),
        }
    }
}

impl Default for BucketSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            region: "us-east-1".to_string(),
            prefix: "videos/".to_string(),
            endpoint_url: None,
            public_base_url: None,
            access_key_id: None,
            secret_access_key: None,
            signed_urls: true,
            signed_url_expiry_secs: 3600,
            max_keys_per_page: 1000,
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://reels.db".to_string(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            backend: SessionBackend::Memory,
            cookie_name: "reel_session".to_string(),
            secure_cookie: false,
            view_limit: crate::session::quota::DEFAULT_VIEW_LIMIT,
            idle_ttl_secs: crate::session::store::DEFAULT_IDLE_TTL.as_secs(),
        }
    }
}

impl SessionSettings {
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            verbose: false,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file; missing sections keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            Error::config(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// Apply environment variable overrides on top of these settings
    pub fn merge_with_env(mut self) -> Result<Self> {
        if let Some(host) = env_var("REELS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_var("REELS_PORT") {
            self.server.port = parse_env("REELS_PORT", &port)?;
        }

        if let Some(mode) = env_var("STORAGE_MODE") {
            self.storage.mode = mode.parse()?;
        }
        if let Some(dir) = env_var("VIDEO_DIR") {
            self.storage.video_dir = PathBuf::from(dir);
        }
        if let Some(prefix) = env_var("VIDEO_URL_PREFIX") {
            self.storage.video_url_prefix = prefix;
        }

        if let Some(name) = env_var("S3_BUCKET_NAME") {
            self.bucket.name = name;
        }
        if let Some(region) = env_var("AWS_REGION") {
            self.bucket.region = region;
        }
        if let Ok(prefix) = std::env::var("S3_PREFIX") {
            // An explicitly empty prefix means the whole bucket.
            self.bucket.prefix = prefix;
        }
        if let Some(endpoint) = env_var("S3_ENDPOINT_URL") {
            self.bucket.endpoint_url = Some(endpoint);
        }
        if let Some(base) = env_var("S3_PUBLIC_BASE_URL") {
            self.bucket.public_base_url = Some(base);
        }
        if let Some(key) = env_var("AWS_ACCESS_KEY_ID") {
            self.bucket.access_key_id = Some(key);
        }
        if let Some(secret) = env_var("AWS_SECRET_ACCESS_KEY") {
            self.bucket.secret_access_key = Some(secret);
        }
        if let Some(signed) = env_var("USE_SIGNED_URLS") {
            self.bucket.signed_urls = parse_bool("USE_SIGNED_URLS", &signed)?;
        }
        if let Some(expiry) = env_var("SIGNED_URL_EXPIRY") {
            self.bucket.signed_url_expiry_secs = parse_env("SIGNED_URL_EXPIRY", &expiry)?;
        }

        if let Some(url) = env_var("DATABASE_URL") {
            self.database.url = url;
        }

        if let Some(backend) = env_var("SESSION_BACKEND") {
            self.session.backend = backend.parse()?;
        }
        if let Some(name) = env_var("SESSION_COOKIE_NAME") {
            self.session.cookie_name = name;
        }
        if let Some(secure) = env_var("SESSION_COOKIE_SECURE") {
            self.session.secure_cookie = parse_bool("SESSION_COOKIE_SECURE", &secure)?;
        }
        if let Some(limit) = env_var("VIEW_LIMIT") {
            self.session.view_limit = parse_env("VIEW_LIMIT", &limit)?;
        }
        if let Some(ttl) = env_var("SESSION_IDLE_TTL") {
            self.session.idle_ttl_secs = parse_env("SESSION_IDLE_TTL", &ttl)?;
        }

        if let Some(level) = env_var("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(self)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.storage.mode == StorageMode::Bucket && self.bucket.name.trim().is_empty() {
            return Err(Error::config("Bucket mode requires a bucket name"));
        }
        if self.bucket.signed_urls
            && !(1..=MAX_SIGNED_URL_EXPIRY_SECS).contains(&self.bucket.signed_url_expiry_secs)
        {
            return Err(Error::config(format!(
                "Signed URL expiry must be between 1 and {} seconds",
                MAX_SIGNED_URL_EXPIRY_SECS
            )));
        }
        if self.bucket.max_keys_per_page <= 0 {
            return Err(Error::config("Bucket page size must be positive"));
        }
        let prefix = &self.storage.video_url_prefix;
        if !prefix.starts_with('/') || prefix.trim_end_matches('/').is_empty() {
            return Err(Error::config(
                "Video URL prefix must start with '/' and name a path below the root",
            ));
        }
        if self.session.view_limit == 0 {
            return Err(Error::config("View limit must be greater than zero"));
        }
        if self.session.idle_ttl_secs == 0 {
            return Err(Error::config("Session idle TTL must be greater than zero"));
        }
        if self.session.cookie_name.trim().is_empty() {
            return Err(Error::config("Session cookie name must not be empty"));
        }
        if self.database.url.trim().is_empty() {
            return Err(Error::config("Database URL must not be empty"));
        }
        Ok(())
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::config(format!("Invalid {}: {}", key, e)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::config(format!("Invalid {}: {}", key, other))),
    }
}
