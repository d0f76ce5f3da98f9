//! Legacy reel metadata table.
//!
//! Before reels were listed straight from storage they were registered as
//! rows holding an external URL. The table still backs the `catalog` storage
//! mode and the add/delete endpoints.

use crate::Result;
use crate::db::SqlitePool;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Sample rows inserted by `reel-feed-init --seed`: (url, title, description)
pub const SAMPLE_REELS: [(&str, &str, &str); 5] = [
    (
        "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4",
        "Big Buck Bunny",
        "A large and lovable rabbit deals with three tiny bullies.",
    ),
    (
        "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4",
        "Elephant's Dream",
        "The story of two strange characters exploring a surreal world.",
    ),
    (
        "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerBlazes.mp4",
        "For Bigger Blazes",
        "A fun video for bigger blazes.",
    ),
    (
        "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerEscapes.mp4",
        "For Bigger Escapes",
        "An escape adventure video.",
    ),
    (
        "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerFun.mp4",
        "For Bigger Fun",
        "A video for bigger fun.",
    ),
];

/// Row of the `reels` table
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CatalogEntry {
    pub id: i64,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All entries, newest first
    pub async fn list(&self) -> Result<Vec<CatalogEntry>> {
        let entries = sqlx::query_as::<_, CatalogEntry>(
            r#"SELECT id, url, title, description, created_at
               FROM reels ORDER BY created_at DESC, id DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Insert an entry and return its row id
    pub async fn insert(&self, url: &str, title: &str, description: &str) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO reels (url, title, description, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(url)
        .bind(title)
        .bind(description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Delete by id; `false` when no row matched
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reels WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reels")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Insert [`SAMPLE_REELS`] when the table is empty. Returns rows inserted.
    pub async fn seed_samples(&self) -> Result<usize> {
        if self.count().await? > 0 {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        for (url, title, description) in SAMPLE_REELS {
            sqlx::query(
                "INSERT INTO reels (url, title, description, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(url)
            .bind(title)
            .bind(description)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(SAMPLE_REELS.len())
    }
}
