//! Desktop notifications with conditional compilation.

use crate::domain::Notification;
use crate::domain::ports::NotificationPort;

/// Desktop notification service.
#[cfg(feature = "notify")]
mod notify_impl {
    use super::{Notification, NotificationPort};
    use notify_rust::Notification as DesktopNotification;

    #[derive(Debug, Clone, Default)]
    pub struct DesktopNotificationService {
        enabled: bool,
    }

    impl DesktopNotificationService {
        #[must_use]
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }
    }

    impl NotificationPort for DesktopNotificationService {
        fn send(&self, notification: Notification) {
            if !self.enabled {
                return;
            }

            let timeout = i32::try_from(notification.duration.as_millis()).unwrap_or(i32::MAX);

            tokio::task::spawn_blocking(move || {
                if let Err(e) = DesktopNotification::new()
                    .summary(&notification.title)
                    .body(&notification.message)
                    .appname("jobsync")
                    .timeout(timeout)
                    .show()
                {
                    tracing::warn!("Failed to show notification: {}", e);
                }
            });
        }
    }
}

/// Logs notifications when the notify feature is disabled.
#[cfg(not(feature = "notify"))]
mod stub_impl {
    use super::{Notification, NotificationPort};

    #[derive(Debug, Clone, Default)]
    pub struct DesktopNotificationService {
        enabled: bool,
    }

    impl DesktopNotificationService {
        #[must_use]
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }
    }

    impl NotificationPort for DesktopNotificationService {
        fn send(&self, notification: Notification) {
            if self.enabled {
                tracing::info!(
                    title = %notification.title,
                    "Desktop notifications unavailable: {}",
                    notification.message
                );
            }
        }
    }
}

#[cfg(feature = "notify")]
pub use notify_impl::DesktopNotificationService;
#[cfg(not(feature = "notify"))]
pub use stub_impl::DesktopNotificationService;
