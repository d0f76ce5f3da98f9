//! Session store abstraction
//!
//! Visitors are identified by an opaque token carried in a cookie. The token
//! maps to [`SessionData`] through a [`SessionStore`]; state is never shared
//! between tokens.

use crate::Result;
use crate::db::Account;
use crate::types::SessionUser;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

/// How long a session may go without being saved before it is discarded
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Opaque per-visitor session token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Fresh random token
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Accept a token presented by a client; anything that is not a UUID is ignored
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::try_parse(raw.trim())
            .ok()
            .map(|id| Self(id.simple().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-visitor state
///
/// `views_count` only matters while `user_id` is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub views_count: u32,
}

impl SessionData {
    /// Session for a freshly authenticated account, counter reset
    pub fn authenticated(account: &Account) -> Self {
        Self {
            user_id: Some(account.id),
            username: Some(account.username.clone()),
            views_count: 0,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.user_id.map(|id| SessionUser {
            id,
            username: self.username.clone().unwrap_or_default(),
        })
    }
}

/// Backing storage for visitor sessions
#[async_trait]
pub trait SessionStore: Send + Sync + fmt::Debug {
    /// Stored data for `token`, `None` for a visitor never saved
    async fn load(&self, token: &SessionToken) -> Result<Option<SessionData>>;

    /// Create or replace the data for `token`
    async fn save(&self, token: &SessionToken, data: &SessionData) -> Result<()>;

    /// Forget `token` entirely
    async fn remove(&self, token: &SessionToken) -> Result<()>;

    /// Stored data, or an empty anonymous session
    async fn load_or_default(&self, token: &SessionToken) -> Result<SessionData> {
        Ok(self.load(token).await?.unwrap_or_default())
    }
}

#[derive(Debug, Clone)]
struct StoredSession {
    data: SessionData,
    touched_at: Instant,
}

/// Process-local session store
///
/// Entries idle for longer than the configured TTL read as absent and are
/// dropped the next time any session is saved.
#[derive(Debug)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionToken, StoredSession>>,
    idle_ttl: Duration,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL)
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    fn is_live(&self, stored: &StoredSession, now: Instant) -> bool {
        now.duration_since(stored.touched_at) < self.idle_ttl
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, token: &SessionToken) -> Result<Option<SessionData>> {
        let now = Instant::now();
        Ok(self
            .sessions
            .read()
            .await
            .get(token)
            .filter(|stored| self.is_live(stored, now))
            .map(|stored| stored.data.clone()))
    }

    async fn save(&self, token: &SessionToken, data: &SessionData) -> Result<()> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, stored| self.is_live(stored, now));
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::debug!(
                expired,
                remaining = sessions.len(),
                "dropped idle sessions"
            );
        }

        sessions.insert(
            token.clone(),
            StoredSession {
                data: data.clone(),
                touched_at: now,
            },
        );
        Ok(())
    }

    async fn remove(&self, token: &SessionToken) -> Result<()> {
        self.sessions.write().await.remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_token_parse() {
        let token = SessionToken::generate();
        assert_eq!(token.as_str().len(), 32);
        assert_eq!(SessionToken::parse(token.as_str()), Some(token.clone()));

        // Hyphenated form normalizes to the same token
        let hyphenated = Uuid::try_parse(token.as_str()).unwrap().hyphenated().to_string();
        assert_eq!(SessionToken::parse(&hyphenated), Some(token));

        assert!(SessionToken::parse("not-a-token").is_none());
        assert!(SessionToken::parse("").is_none());
    }

    #[test]
    fn test_authenticated_resets_counter() {
        let account = Account {
            id: 7,
            username: "mira".to_string(),
            email: "mira@example.com".to_string(),
            password_hash: "digest".to_string(),
            created_at: Utc::now(),
        };
        let data = SessionData::authenticated(&account);

        assert!(data.is_authenticated());
        assert_eq!(data.views_count, 0);
        assert_eq!(
            data.user(),
            Some(SessionUser {
                id: 7,
                username: "mira".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_memory_store_isolates_tokens() {
        let store = MemorySessionStore::new();
        let first = SessionToken::generate();
        let second = SessionToken::generate();

        let data = SessionData {
            views_count: 3,
            ..Default::default()
        };
        store.save(&first, &data).await.unwrap();

        assert_eq!(store.load(&first).await.unwrap(), Some(data));
        assert_eq!(store.load(&second).await.unwrap(), None);
        assert_eq!(
            store.load_or_default(&second).await.unwrap(),
            SessionData::default()
        );

        store.remove(&first).await.unwrap();
        assert!(store.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_expired_token_loads_as_none() {
        let store = MemorySessionStore::with_idle_ttl(Duration::from_millis(20));
        let token = SessionToken::generate();
        let data = SessionData {
            views_count: 2,
            ..Default::default()
        };
        store.save(&token, &data).await.unwrap();
        assert_eq!(store.load(&token).await.unwrap(), Some(data));

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(store.load(&token).await.unwrap(), None);
        assert_eq!(
            store.load_or_default(&token).await.unwrap(),
            SessionData::default()
        );
    }

    #[tokio::test]
    async fn test_cookieless_visitors_do_not_accumulate() {
        let store = MemorySessionStore::with_idle_ttl(Duration::from_millis(20));
        let data = SessionData {
            views_count: 1,
            ..Default::default()
        };
        // Each visitor without a cookie gets a fresh token per request
        for _ in 0..200 {
            store.save(&SessionToken::generate(), &data).await.unwrap();
        }
        assert_eq!(store.sessions.read().await.len(), 200);

        tokio::time::sleep(Duration::from_millis(60)).await;

        let latest = SessionToken::generate();
        store.save(&latest, &data).await.unwrap();

        let sessions = store.sessions.read().await;
        assert_eq!(sessions.len(), 1);
        assert!(sessions.contains_key(&latest));
    }

    #[tokio::test]
    async fn test_saving_refreshes_idle_clock() {
        let store = MemorySessionStore::with_idle_ttl(Duration::from_millis(200));
        let token = SessionToken::generate();
        let data = SessionData::default();

        store.save(&token, &data).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
        store.save(&token, &data).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(store.load(&token).await.unwrap().is_some());
    }
}
