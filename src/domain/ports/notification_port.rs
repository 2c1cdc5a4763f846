use crate::domain::Notification;

/// Port for user-visible notifications (toasts).
pub trait NotificationPort: Send + Sync {
    /// Shows a notification.
    fn send(&self, notification: Notification);
}
