//! Debounced, throttled refresh scheduling.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Minimum time between two accepted refreshes.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1000);
/// Delay between accepting a refresh and sending it.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(200);

/// Timing policy of a [`FetchScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerPolicy {
    /// Refreshes closer than this to the last accepted one are dropped.
    pub min_interval: Duration,
    /// Delay before an accepted refresh fires.
    pub debounce_delay: Duration,
}

impl Default for SchedulerPolicy {
    fn default() -> Self {
        Self {
            min_interval: MIN_INTERVAL,
            debounce_delay: DEBOUNCE_DELAY,
        }
    }
}

/// Result of a [`FetchScheduler::schedule`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// A timer was armed; the fetch fires after the debounce delay.
    Armed,
    /// Dropped because a scheduled fetch is still running.
    InFlight,
    /// Dropped because the last accepted refresh is too recent.
    Throttled,
}

#[derive(Debug, Default)]
struct SchedulerState {
    last_fetch: Option<Instant>,
    pending: Option<JoinHandle<()>>,
}

/// Clears the in-flight flag when the fetch completes or unwinds.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Coalesces bursts of refresh requests into a single fetch.
///
/// Requests are dropped, never queued. Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct FetchScheduler {
    policy: SchedulerPolicy,
    state: Mutex<SchedulerState>,
    in_flight: Arc<AtomicBool>,
}

impl Default for FetchScheduler {
    fn default() -> Self {
        Self::new(SchedulerPolicy::default())
    }
}

impl FetchScheduler {
    #[must_use]
    pub fn new(policy: SchedulerPolicy) -> Self {
        Self {
            policy,
            state: Mutex::new(SchedulerState::default()),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub const fn policy(&self) -> SchedulerPolicy {
        self.policy
    }

    /// Requests a fetch; `fetch(bypass_cache)` runs after the debounce delay.
    ///
    /// Once the delay elapses the fetch is detached from the timer, so
    /// [`Self::cancel`] only prevents fetches that have not started.
    pub fn schedule<F, Fut>(&self, fetch: F, bypass_cache: bool) -> ScheduleOutcome
    where
        F: FnOnce(bool) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.in_flight.load(Ordering::SeqCst) {
            debug!("Fetch already in flight, dropping request");
            return ScheduleOutcome::InFlight;
        }

        let mut state = self.state.lock();
        let now = Instant::now();

        if let Some(last) = state.last_fetch {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.policy.min_interval {
                debug!(
                    elapsed_ms = elapsed.as_millis(),
                    "Refresh requested too soon, dropping request"
                );
                return ScheduleOutcome::Throttled;
            }
        }

        state.last_fetch = Some(now);

        if let Some(previous) = state.pending.take() {
            trace!("Replacing pending debounce timer");
            previous.abort();
        }

        let in_flight = Arc::clone(&self.in_flight);
        let delay = self.policy.debounce_delay;

        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            in_flight.store(true, Ordering::SeqCst);
            let guard = InFlightGuard(in_flight);
            tokio::spawn(async move {
                let _guard = guard;
                fetch(bypass_cache).await;
            });
        }));

        ScheduleOutcome::Armed
    }

    /// Clears the pending timer, if any.
    pub fn cancel(&self) {
        if let Some(pending) = self.state.lock().pending.take() {
            if !pending.is_finished() {
                debug!("Cancelling pending fetch");
            }
            pending.abort();
        }
    }

    /// Clears the pending timer and forgets the last accepted refresh.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
        state.last_fetch = None;
    }

    /// Returns whether a debounce timer is armed and has not fired yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state
            .lock()
            .pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Returns whether a scheduled fetch is running.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl Drop for FetchScheduler {
    fn drop(&mut self) {
        if let Some(pending) = self.state.get_mut().pending.take() {
            pending.abort();
        }
    }
}
