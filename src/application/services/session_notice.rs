//! Session-expiry toast deduplication.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::domain::Notification;
use crate::domain::ports::NotificationPort;

/// Notification sink shared by all synchronizers of a session.
///
/// An expired token fails every collection at once; only the first
/// session-expiry toast is forwarded until [`Self::rearm`] is called.
/// Other notifications pass through unchanged.
pub struct SessionNoticeGate {
    inner: Arc<dyn NotificationPort>,
    announced: AtomicBool,
}

impl SessionNoticeGate {
    #[must_use]
    pub fn new(inner: Arc<dyn NotificationPort>) -> Self {
        Self {
            inner,
            announced: AtomicBool::new(false),
        }
    }

    /// Allows the next session-expiry toast through, e.g. after a new sign-in.
    pub fn rearm(&self) {
        self.announced.store(false, Ordering::SeqCst);
    }

    /// Returns whether a session-expiry toast was forwarded since the last rearm.
    #[must_use]
    pub fn is_announced(&self) -> bool {
        self.announced.load(Ordering::SeqCst)
    }
}

impl NotificationPort for SessionNoticeGate {
    fn send(&self, notification: Notification) {
        if notification.session_expired && self.announced.swap(true, Ordering::SeqCst) {
            debug!("Session expiry already announced, dropping toast");
            return;
        }
        self.inner.send(notification);
    }
}
