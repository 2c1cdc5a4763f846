mod fetch_scheduler;
mod notification_manager;
mod session_notice;
mod synchronizer;

pub use fetch_scheduler::{
    DEBOUNCE_DELAY, FetchScheduler, MIN_INTERVAL, ScheduleOutcome, SchedulerPolicy,
};
pub use notification_manager::NotificationManager;
pub use session_notice::SessionNoticeGate;
pub use synchronizer::{CollectionSynchronizer, FetchOutcome, RefreshOutcome};
