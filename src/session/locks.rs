//! Per-token serialization of session updates
//!
//! Handlers that load a session, change it and save it back hold the token's
//! lock for the whole cycle so concurrent requests on one cookie cannot
//! overwrite each other's result.

use crate::session::store::SessionToken;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-token locks
///
/// Only weak references are kept, so an entry disappears once no request
/// holds or waits on it.
#[derive(Debug, Clone, Default)]
pub struct SessionLocks {
    locks: Arc<Mutex<HashMap<SessionToken, Weak<Mutex<()>>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `token`'s session
    pub async fn lock(&self, token: &SessionToken) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, lock| lock.strong_count() > 0);

            match locks.get(token).and_then(Weak::upgrade) {
                Some(lock) => lock,
                None => {
                    let lock = Arc::new(Mutex::new(()));
                    locks.insert(token.clone(), Arc::downgrade(&lock));
                    lock
                }
            }
        };
        lock.lock_owned().await
    }
}
