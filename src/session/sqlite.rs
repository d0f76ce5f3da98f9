use crate::Result;
use crate::db::SqlitePool;
use crate::session::store::{DEFAULT_IDLE_TTL, SessionData, SessionStore, SessionToken};
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;

/// Session store persisted in the `sessions` table as JSON
///
/// Rows not saved within the idle TTL are ignored on load and deleted on the
/// next save.
#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    pool: SqlitePool,
    idle_ttl: Duration,
}

impl SqliteSessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            idle_ttl: DEFAULT_IDLE_TTL,
        }
    }

    pub fn with_idle_ttl(mut self, idle_ttl: Duration) -> Self {
        self.idle_ttl = idle_ttl;
        self
    }

    /// Rows with `updated_at` at or before this instant have expired
    fn cutoff(&self) -> i64 {
        let ttl = i64::try_from(self.idle_ttl.as_secs()).unwrap_or(i64::MAX);
        Utc::now().timestamp().saturating_sub(ttl)
    }

    async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE updated_at <= ?")
            .bind(self.cutoff())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn load(&self, token: &SessionToken) -> Result<Option<SessionData>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT data FROM sessions WHERE token = ? AND updated_at > ?")
                .bind(token.as_str())
                .bind(self.cutoff())
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((json,)) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, token: &SessionToken, data: &SessionData) -> Result<()> {
        let expired = self.purge_expired().await?;
        if expired > 0 {
            tracing::debug!(expired, "dropped idle sessions");
        }

        let json = serde_json::to_string(data)?;
        sqlx::query(
            r#"
            INSERT INTO sessions (token, data, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(token) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(token.as_str())
        .bind(json)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, token: &SessionToken) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
