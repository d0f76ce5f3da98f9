//! SQL DDL for initializing the reel feed database.

/// SQLite schema with:
/// - `users`: accounts, `username` and `email` each UNIQUE
/// - `reels`: legacy catalog metadata, indexed by `created_at`
/// - `sessions`: serialized visitor sessions keyed by opaque token, indexed by
///   `updated_at` for idle expiry
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL -- RFC3339
);

CREATE TABLE IF NOT EXISTS reels (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    title TEXT NULL,
    description TEXT NULL,
    created_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_reels_created_at ON reels(created_at);

CREATE TABLE IF NOT EXISTS sessions (
    token TEXT PRIMARY KEY,
    data TEXT NOT NULL, -- JSON
    updated_at INTEGER NOT NULL -- unix seconds
);

CREATE INDEX IF NOT EXISTS idx_sessions_updated_at ON sessions(updated_at);
"#;
