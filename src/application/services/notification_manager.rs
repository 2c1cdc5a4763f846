use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;

use crate::domain::ports::NotificationPort;
use crate::domain::{Notification, NotificationLevel};

/// In-process toast queue.
///
/// Synchronizers push into it from any task; the host pops and displays one
/// toast at a time.
#[derive(Debug)]
pub struct NotificationManager {
    queue: Mutex<VecDeque<Notification>>,
    default_duration: Duration,
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl NotificationManager {
    #[must_use]
    pub fn new(default_duration: Duration) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            default_duration,
        }
    }

    pub fn notify(
        &self,
        level: NotificationLevel,
        title: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.send(Notification::new(level, title, message));
    }

    pub fn error(&self, title: impl Into<String>, message: impl Into<String>) {
        self.notify(NotificationLevel::Error, title, message);
    }

    /// Advances the display clock, dropping the front toast once expired.
    pub fn tick(&self) {
        let mut queue = self.queue.lock();
        if let Some(front) = queue.front_mut() {
            front.mark_displayed();
            if front.is_expired() {
                queue.pop_front();
                if let Some(next) = queue.front_mut() {
                    next.mark_displayed();
                }
            }
        }
    }

    #[must_use]
    pub fn current_notification(&self) -> Option<Notification> {
        self.queue.lock().front().cloned()
    }

    /// Removes and returns all queued toasts.
    pub fn drain(&self) -> Vec<Notification> {
        self.queue.lock().drain(..).collect()
    }

    #[must_use]
    pub fn has_notifications(&self) -> bool {
        !self.queue.lock().is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_notifications()
    }
}

impl NotificationPort for NotificationManager {
    fn send(&self, notification: Notification) {
        let notification = notification.with_duration(self.default_duration);
        self.queue.lock().push_back(notification);
    }
}
