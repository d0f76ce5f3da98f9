//! Database module: connection setup, schema and repositories.
//!
//! Layout:
//! - `schema.rs`: SQL DDL for initializing the database (SQLite)
//! - `accounts.rs`: account rows and queries
//! - `catalog.rs`: legacy reel metadata rows and queries

pub mod accounts;
pub mod catalog;
pub mod schema;

pub use accounts::{Account, AccountRepository};
pub use catalog::{CatalogEntry, CatalogRepository};
pub use schema::SQLITE_INIT;

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

/// Open a pool for `url`, creating the database file when missing.
///
/// In-memory databases live only as long as their connection, so they are
/// pinned to exactly one connection that is never recycled.
pub async fn connect(url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

    let pool = if is_in_memory(url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new().connect_with(options).await?
    };

    tracing::debug!(url = %url, "database pool opened");
    Ok(pool)
}

/// Initialize the schema by executing the bundled DDL.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    // sqlx::query runs one statement at a time
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}

/// Connect and make sure every table exists
pub async fn connect_and_migrate(url: &str) -> Result<SqlitePool> {
    let pool = connect(url).await?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// Version string reported by the SQLite engine behind `pool`
pub async fn sqlite_version(pool: &SqlitePool) -> Result<String> {
    let version: String = sqlx::query_scalar("SELECT sqlite_version()")
        .fetch_one(pool)
        .await?;
    Ok(version)
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
