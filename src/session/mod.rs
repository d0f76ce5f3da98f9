//! Visitor sessions and the anonymous view quota
//!
//! Sessions are keyed by an opaque cookie token and live behind the
//! [`SessionStore`] trait: [`MemorySessionStore`] for tests and single-process
//! deployments, [`SqliteSessionStore`] when sessions should survive restarts.
//! Both stores forget a session once it has gone unsaved for the idle TTL.
//! The [`QuotaTracker`] applies the anonymous view limit to a session and
//! [`SessionLocks`] keeps updates to one token from interleaving.

pub mod locks;
pub mod quota;
pub mod sqlite;
pub mod store;

pub use locks::SessionLocks;
pub use quota::{DEFAULT_VIEW_LIMIT, QuotaTracker, ViewStatus};
pub use sqlite::SqliteSessionStore;
pub use store::{
    DEFAULT_IDLE_TTL, MemorySessionStore, SessionData, SessionStore, SessionToken,
};
