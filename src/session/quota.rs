//! Anonymous view quota
//!
//! Anonymous visitors may watch a fixed number of reels before they are asked
//! to log in. Logged-in visitors are never counted.

use crate::session::store::SessionData;
use crate::types::ViewerStatus;
use serde::{Deserialize, Serialize};

/// Views an anonymous visitor gets before login is required
pub const DEFAULT_VIEW_LIMIT: u32 = 10;

/// Result of recording or inspecting a visitor's views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewStatus {
    pub views_count: u32,
    /// `None` for logged-in visitors (unlimited)
    pub views_remaining: Option<u32>,
    pub requires_login: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct QuotaTracker {
    limit: u32,
}

impl QuotaTracker {
    pub fn new(limit: u32) -> Self {
        Self { limit }
    }

    /// Count one view against the session.
    ///
    /// The counter keeps growing past the limit; it only goes back to zero
    /// when the visitor logs in.
    pub fn record_view(&self, session: &mut SessionData) -> ViewStatus {
        if !session.is_authenticated() {
            session.views_count = session.views_count.saturating_add(1);
        }
        self.status(session)
    }

    /// Current standing without counting a view
    pub fn status(&self, session: &SessionData) -> ViewStatus {
        if session.is_authenticated() {
            return ViewStatus {
                views_count: session.views_count,
                views_remaining: None,
                requires_login: false,
            };
        }

        let used = session.views_count;
        ViewStatus {
            views_count: used,
            views_remaining: Some(self.limit.saturating_sub(used)),
            requires_login: used >= self.limit,
        }
    }

    /// Summary embedded in the reel listing
    pub fn viewer_status(&self, session: &SessionData) -> ViewerStatus {
        let status = self.status(session);
        ViewerStatus {
            is_logged_in: session.is_authenticated(),
            views_count: status.views_count,
            views_remaining: status.views_remaining,
        }
    }
}

impl Default for QuotaTracker {
    fn default() -> Self {
        Self::new(DEFAULT_VIEW_LIMIT)
    }
}
