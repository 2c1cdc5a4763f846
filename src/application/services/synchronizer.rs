//! Collection synchronizer: one fetch lifecycle mirrored into one store slice.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::fetch_scheduler::{FetchScheduler, ScheduleOutcome, SchedulerPolicy};
use crate::domain::entities::{
    CollectionEnvelope, CollectionSpec, Entity, FailurePolicy, FetchState, Identity,
    IdentityTransition, SyncPhase,
};
use crate::domain::errors::ClientError;
use crate::domain::ports::{ApiPort, NotificationPort, SharedStorePort};
use crate::domain::request::RequestDescriptor;
use crate::domain::Notification;

/// How a single network fetch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Items replaced from a `success: true` payload.
    Updated { count: usize },
    /// The payload said `success: false`.
    Rejected { message: Option<String> },
    /// Transport or HTTP failure.
    Failed(ClientError),
    /// Not sent because another fetch was in flight.
    Skipped,
    /// Response arrived after teardown or an identity change and was ignored.
    Discarded,
}

/// Result of a [`CollectionSynchronizer::refresh`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Identity absent: state and store slice were cleared without a request.
    Cleared,
    /// A debounced fetch was armed.
    Scheduled,
    /// Dropped by the minimum-interval gate.
    Throttled,
    /// Dropped because a fetch is in flight.
    InFlight,
    /// The fetch ran to completion.
    Completed(FetchOutcome),
}

struct SyncCore {
    spec: CollectionSpec,
    api: Arc<dyn ApiPort>,
    store: Arc<dyn SharedStorePort>,
    notifications: Arc<dyn NotificationPort>,
    state: Mutex<FetchState>,
    identity: Mutex<Identity>,
    /// Bumped whenever state is cleared; responses from older generations are dropped.
    generation: AtomicU64,
    live: AtomicBool,
    first_load: AtomicBool,
    /// Set when an identity change found a fetch of the previous identity in flight.
    reload_owed: AtomicBool,
}

impl SyncCore {
    /// Fetches, then reloads once more if the response belonged to a
    /// previous identity and a sign-in was waiting on it.
    async fn run(&self, bypass_cache: bool) -> FetchOutcome {
        let mut outcome = self.fetch(bypass_cache).await;
        while outcome == FetchOutcome::Discarded && self.take_owed_reload() {
            info!(collection = self.spec.name, "Reloading for current identity");
            outcome = self.fetch(false).await;
        }
        outcome
    }

    fn take_owed_reload(&self) -> bool {
        self.reload_owed.swap(false, Ordering::SeqCst)
            && self.live.load(Ordering::SeqCst)
            && (!self.spec.identity_scoped || self.identity.lock().is_present())
    }

    async fn fetch(&self, bypass_cache: bool) -> FetchOutcome {
        if !self.state.lock().begin() {
            debug!(collection = self.spec.name, "Fetch already in flight, skipping");
            return FetchOutcome::Skipped;
        }
        let generation = self.generation.load(Ordering::SeqCst);

        let mut request = RequestDescriptor::get(self.spec.path);
        if bypass_cache {
            request = request.bypassing_cache(Utc::now().timestamp_millis());
        }

        debug!(collection = self.spec.name, bypass_cache, "Fetching collection");
        let result = self.api.request(&request).await;
        let first_load = self.first_load.swap(false, Ordering::SeqCst);

        let outcome = {
            let mut state = self.state.lock();

            if !self.live.load(Ordering::SeqCst) {
                debug!(collection = self.spec.name, "Synchronizer torn down, discarding response");
                state.loading = false;
                return FetchOutcome::Discarded;
            }
            if self.generation.load(Ordering::SeqCst) != generation {
                debug!(collection = self.spec.name, "Identity changed mid-flight, discarding response");
                state.loading = false;
                return FetchOutcome::Discarded;
            }

            match result {
                Ok(response) => {
                    match CollectionEnvelope::parse(&response.body, self.spec.envelope_key)
                        .into_accepted()
                    {
                        Ok(items) => self.apply_items(&mut state, items),
                        Err(message) => {
                            self.apply_policy(&mut state, self.spec.payload_failure);
                            debug!(
                                collection = self.spec.name,
                                message = message.as_deref().unwrap_or_default(),
                                "Server rejected collection request"
                            );
                            FetchOutcome::Rejected { message }
                        }
                    }
                }
                Err(error) => {
                    warn!(collection = self.spec.name, error = %error, "Collection fetch failed");
                    self.apply_policy(&mut state, self.spec.error_policy);
                    FetchOutcome::Failed(error)
                }
            }
        };

        if let FetchOutcome::Failed(error) = &outcome {
            self.report(error, first_load);
        }

        outcome
    }

    fn apply_items(&self, state: &mut FetchState, items: Vec<Entity>) -> FetchOutcome {
        let count = items.len();
        self.store.replace(self.spec.slice, items.clone());
        state.succeed(items);
        info!(collection = self.spec.name, count, "Collection synchronized");
        FetchOutcome::Updated { count }
    }

    fn apply_policy(&self, state: &mut FetchState, policy: FailurePolicy) {
        match policy {
            FailurePolicy::Retain => state.fail(),
            FailurePolicy::Clear => {
                state.fail_and_clear();
                self.store.clear(self.spec.slice);
            }
        }
    }

    fn report(&self, error: &ClientError, first_load: bool) {
        if error.is_session_error() {
            self.notifications
                .send(Notification::session_expired(error.user_message()));
            return;
        }

        if first_load {
            debug!(collection = self.spec.name, "Suppressing error toast for first load");
            return;
        }

        let message = error.backend_message().unwrap_or(self.spec.default_error);
        self.notifications
            .send(Notification::error(self.spec.name, message));
    }

    fn clear(&self) {
        let mut state = self.state.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        state.reset();
        self.store.clear(self.spec.slice);
        debug!(collection = self.spec.name, "Cleared collection state");
    }
}

/// Owns one collection's fetch lifecycle and its mirrored store slice.
///
/// Driven by identity changes and explicit refreshes; collection-specific
/// behavior comes from its [`CollectionSpec`].
pub struct CollectionSynchronizer {
    core: Arc<SyncCore>,
    scheduler: Option<FetchScheduler>,
}

impl CollectionSynchronizer {
    /// Creates a synchronizer; nothing is fetched until [`Self::mount`].
    #[must_use]
    pub fn new(
        spec: CollectionSpec,
        api: Arc<dyn ApiPort>,
        store: Arc<dyn SharedStorePort>,
        notifications: Arc<dyn NotificationPort>,
        policy: SchedulerPolicy,
    ) -> Self {
        let scheduler = spec.scheduled.then(|| FetchScheduler::new(policy));

        Self {
            core: Arc::new(SyncCore {
                spec,
                api,
                store,
                notifications,
                state: Mutex::new(FetchState::default()),
                identity: Mutex::new(Identity::Absent),
                generation: AtomicU64::new(0),
                live: AtomicBool::new(false),
                first_load: AtomicBool::new(true),
                reload_owed: AtomicBool::new(false),
            }),
            scheduler,
        }
    }

    #[must_use]
    pub fn spec(&self) -> CollectionSpec {
        self.core.spec
    }

    /// Starts the synchronizer with the current identity.
    ///
    /// Identity-agnostic collections fetch once; identity-scoped collections
    /// fetch only when a user is present. Returns `None` when nothing was requested.
    pub async fn mount(&self, identity: &Identity) -> Option<RefreshOutcome> {
        self.core.live.store(true, Ordering::SeqCst);
        *self.core.identity.lock() = identity.clone();

        if self.core.spec.identity_scoped && !identity.is_present() {
            return None;
        }
        Some(self.refresh(false).await)
    }

    /// Applies an identity change.
    ///
    /// Sign-out clears state and store slice without a request; sign-in
    /// fetches; switching users does both. Identity-agnostic collections
    /// ignore identity.
    pub async fn on_identity_change(&self, identity: Identity) -> Option<RefreshOutcome> {
        let transition = {
            let mut current = self.core.identity.lock();
            let transition = current.transition_to(&identity);
            *current = identity;
            transition
        };

        if !self.core.spec.identity_scoped {
            return None;
        }

        match transition {
            IdentityTransition::Unchanged => None,
            IdentityTransition::SignedIn => Some(self.request(false, true).await),
            IdentityTransition::SignedOut => {
                info!(collection = self.core.spec.name, "Signed out, clearing collection");
                self.clear();
                Some(RefreshOutcome::Cleared)
            }
            IdentityTransition::Switched => {
                info!(collection = self.core.spec.name, "User switched, reloading collection");
                self.clear();
                Some(self.request(false, true).await)
            }
        }
    }

    /// Requests fresh data.
    ///
    /// For identity-scoped collections without a signed-in user this clears
    /// instead. Scheduled collections return once the fetch is armed; others
    /// return once it completes.
    pub async fn refresh(&self, bypass_cache: bool) -> RefreshOutcome {
        self.request(bypass_cache, false).await
    }

    /// `identity_changed` marks refreshes caused by a new identity: if the
    /// in-flight fetch belongs to the previous one, a reload is owed once it
    /// has been discarded.
    async fn request(&self, bypass_cache: bool, identity_changed: bool) -> RefreshOutcome {
        if self.core.spec.identity_scoped && !self.core.identity.lock().is_present() {
            self.clear();
            return RefreshOutcome::Cleared;
        }

        {
            let state = self.core.state.lock();
            if state.loading {
                if identity_changed {
                    debug!(collection = self.core.spec.name, "Previous identity still loading, reload owed");
                    self.core.reload_owed.store(true, Ordering::SeqCst);
                } else {
                    debug!(collection = self.core.spec.name, "Refresh dropped, fetch in flight");
                }
                return RefreshOutcome::InFlight;
            }
        }

        match &self.scheduler {
            Some(scheduler) => {
                let core = Arc::clone(&self.core);
                let scheduled = scheduler.schedule(
                    move |bypass| async move {
                        core.run(bypass).await;
                    },
                    bypass_cache,
                );
                match scheduled {
                    ScheduleOutcome::Armed => RefreshOutcome::Scheduled,
                    ScheduleOutcome::InFlight => RefreshOutcome::InFlight,
                    ScheduleOutcome::Throttled => RefreshOutcome::Throttled,
                }
            }
            None => RefreshOutcome::Completed(self.core.run(bypass_cache).await),
        }
    }

    /// Stops the synchronizer: pending timers are cleared and in-flight
    /// responses no longer touch local state.
    pub fn teardown(&self) {
        if self.core.live.swap(false, Ordering::SeqCst) {
            debug!(collection = self.core.spec.name, "Tearing down synchronizer");
        }
        if let Some(scheduler) = &self.scheduler {
            scheduler.cancel();
        }
    }

    fn clear(&self) {
        if let Some(scheduler) = &self.scheduler {
            scheduler.reset();
        }
        self.core.clear();
    }

    /// Returns a copy of the fetch state.
    #[must_use]
    pub fn state(&self) -> FetchState {
        self.core.state.lock().clone()
    }

    #[must_use]
    pub fn items(&self) -> Vec<Entity> {
        self.core.state.lock().items.clone()
    }

    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        self.core.state.lock().phase()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.core.state.lock().loading
    }

    /// Returns whether a fetch is pending or running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.is_loading()
            || self
                .scheduler
                .as_ref()
                .is_some_and(|s| s.is_pending() || s.is_in_flight())
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.core.live.load(Ordering::SeqCst)
    }
}

impl Drop for CollectionSynchronizer {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{LastOutcome, StoreSlice};
    use crate::domain::errors::{SessionFailure, SessionFailureKind};
    use crate::domain::ports::mocks::{RecordingNotifications, ScriptedApi};
    use crate::infrastructure::InMemoryStore;
    use serde_json::{Value, json};
    use std::time::Duration;
    use tokio::time::sleep;

    struct Harness {
        api: Arc<ScriptedApi>,
        store: Arc<InMemoryStore>,
        notifications: Arc<RecordingNotifications>,
        sync: Arc<CollectionSynchronizer>,
    }

    fn harness(spec: CollectionSpec, api: ScriptedApi) -> Harness {
        let api = Arc::new(api);
        let store = Arc::new(InMemoryStore::new());
        let notifications = Arc::new(RecordingNotifications::new());
        let sync = Arc::new(CollectionSynchronizer::new(
            spec,
            api.clone(),
            store.clone(),
            notifications.clone(),
            SchedulerPolicy::default(),
        ));
        Harness {
            api,
            store,
            notifications,
            sync,
        }
    }

    fn entities(value: Value) -> Vec<Entity> {
        value
            .as_array()
            .map(|items| items.iter().cloned().map(Entity::new).collect())
            .unwrap_or_default()
    }

    fn settle() -> tokio::time::Sleep {
        sleep(Duration::from_millis(300))
    }

    /// Mounts and lets the first (toast-suppressed) fetch complete.
    async fn mount_and_settle(h: &Harness, identity: &Identity) {
        h.sync.mount(identity).await;
        settle().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_saved_jobs_scenario_replaces_items() {
        let h = harness(
            CollectionSpec::SAVED_JOBS,
            ScriptedApi::ok(json!({"success": true, "savedJobs": [{"id": "a"}, {"id": "b"}]})),
        );

        let outcome = h.sync.mount(&Identity::present("u1")).await;
        assert_eq!(outcome, Some(RefreshOutcome::Scheduled));
        settle().await;

        let expected = entities(json!([{"id": "a"}, {"id": "b"}]));
        assert_eq!(h.sync.items(), expected);
        assert_eq!(h.store.snapshot(StoreSlice::SavedJobs), expected);
        assert_eq!(h.api.calls(), 1);
        assert_eq!(h.api.requests()[0].path(), "/job/saved");
    }

    #[tokio::test]
    async fn test_round_trip_preserves_server_order() {
        let body = json!([{"_id": "j3"}, {"_id": "j1"}, {"_id": "j2"}, {"_id": "j5"}]);
        let h = harness(
            CollectionSpec::ADMIN_JOBS,
            ScriptedApi::ok(json!({"success": true, "jobs": body.clone()})),
        );

        let outcome = h.sync.mount(&Identity::Absent).await;

        assert_eq!(
            outcome,
            Some(RefreshOutcome::Completed(FetchOutcome::Updated { count: 4 }))
        );
        assert_eq!(h.sync.items(), entities(body.clone()));
        assert_eq!(h.store.snapshot(StoreSlice::AdminJobs), entities(body));
    }

    #[tokio::test]
    async fn test_absent_identity_refresh_clears_without_request() {
        let h = harness(
            CollectionSpec::SAVED_JOBS,
            ScriptedApi::ok(json!({"success": true, "savedJobs": [{"id": "a"}]})),
        );
        h.store
            .replace(StoreSlice::SavedJobs, entities(json!([{"id": "stale"}])));

        assert_eq!(h.sync.mount(&Identity::Absent).await, None);
        assert_eq!(h.sync.refresh(false).await, RefreshOutcome::Cleared);

        assert_eq!(h.api.calls(), 0);
        assert!(h.store.snapshot(StoreSlice::SavedJobs).is_empty());
        assert!(h.sync.items().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_out_clears_state_and_store_without_request() {
        for spec in [CollectionSpec::APPLIED_JOBS, CollectionSpec::SAVED_JOBS] {
            let mut body = json!({"success": true});
            body[spec.envelope_key] = json!([{"id": "a"}]);
            let h = harness(spec, ScriptedApi::ok(body));
            mount_and_settle(&h, &Identity::present("u1")).await;
            assert_eq!(h.sync.items().len(), 1);
            let calls_before = h.api.calls();

            let outcome = h.sync.on_identity_change(Identity::Absent).await;

            assert_eq!(outcome, Some(RefreshOutcome::Cleared));
            assert!(h.sync.items().is_empty());
            assert!(!h.sync.state().is_fetched());
            assert!(h.store.snapshot(spec.slice).is_empty());
            assert_eq!(h.api.calls(), calls_before);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_in_triggers_fetch() {
        let h = harness(
            CollectionSpec::APPLIED_JOBS,
            ScriptedApi::ok(json!({"success": true, "application": [{"_id": "app1"}]})),
        );
        h.sync.mount(&Identity::Absent).await;
        assert_eq!(h.api.calls(), 0);

        let outcome = h.sync.on_identity_change(Identity::present("u1")).await;
        assert_eq!(outcome, Some(RefreshOutcome::Scheduled));
        settle().await;

        assert_eq!(h.api.calls(), 1);
        assert_eq!(h.store.len(StoreSlice::AppliedJobs), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_while_loading_issues_no_second_request() {
        let h = harness(
            CollectionSpec::SAVED_JOBS,
            ScriptedApi::ok(json!({"success": true, "savedJobs": []})),
        );
        h.api.hold_responses();

        h.sync.mount(&Identity::present("u1")).await;
        settle().await;
        assert!(h.sync.is_loading());
        assert_eq!(h.sync.phase(), SyncPhase::Fetching);

        sleep(Duration::from_secs(2)).await;
        assert_eq!(h.sync.refresh(true).await, RefreshOutcome::InFlight);
        settle().await;
        assert_eq!(h.api.calls(), 1);

        h.api.release_one();
        settle().await;
        assert!(!h.sync.is_loading());
        assert!(h.sync.state().is_fetched());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unscheduled_refresh_while_loading_is_dropped() {
        let h = harness(
            CollectionSpec::COMPANIES,
            ScriptedApi::ok(json!({"success": true, "companies": [{"_id": "c1"}]})),
        );
        h.api.hold_responses();

        let sync = Arc::clone(&h.sync);
        let first = tokio::spawn(async move { sync.mount(&Identity::Absent).await });
        sleep(Duration::from_millis(1)).await;

        assert_eq!(h.sync.refresh(false).await, RefreshOutcome::InFlight);
        assert_eq!(h.api.calls(), 1);

        h.api.release_one();
        let outcome = first.await.unwrap();
        assert_eq!(
            outcome,
            Some(RefreshOutcome::Completed(FetchOutcome::Updated { count: 1 }))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_refreshes_coalesce_into_one_request() {
        let h = harness(
            CollectionSpec::APPLIED_JOBS,
            ScriptedApi::ok(json!({"success": true, "application": []})),
        );
        mount_and_settle(&h, &Identity::present("u1")).await;
        sleep(Duration::from_secs(2)).await;

        assert_eq!(h.sync.refresh(false).await, RefreshOutcome::Scheduled);
        assert_eq!(h.sync.refresh(false).await, RefreshOutcome::Throttled);
        assert_eq!(h.sync.refresh(true).await, RefreshOutcome::Throttled);
        settle().await;

        assert_eq!(h.api.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_saved_jobs_payload_failure_clears_silently() {
        let h = harness(
            CollectionSpec::SAVED_JOBS,
            ScriptedApi::ok(json!({"success": true, "savedJobs": [{"id": "a"}]})),
        );
        mount_and_settle(&h, &Identity::present("u1")).await;
        assert_eq!(h.store.len(StoreSlice::SavedJobs), 1);

        h.api
            .set_reply(Ok(crate::domain::ApiResponse::ok(json!({"success": false}))));
        sleep(Duration::from_secs(2)).await;
        h.sync.refresh(false).await;
        settle().await;

        assert!(h.sync.items().is_empty());
        assert!(h.store.snapshot(StoreSlice::SavedJobs).is_empty());
        assert_eq!(h.notifications.count(), 0);
        assert_eq!(h.sync.phase(), SyncPhase::Idle(Some(LastOutcome::Failed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_applied_jobs_payload_failure_retains_items() {
        let h = harness(
            CollectionSpec::APPLIED_JOBS,
            ScriptedApi::ok(json!({"success": true, "application": [{"_id": "a"}]})),
        );
        mount_and_settle(&h, &Identity::present("u1")).await;

        h.api.set_reply(Ok(crate::domain::ApiResponse::ok(
            json!({"success": false, "message": "nothing new"}),
        )));
        sleep(Duration::from_secs(2)).await;
        h.sync.refresh(false).await;
        settle().await;

        assert_eq!(h.sync.items().len(), 1);
        assert_eq!(h.store.len(StoreSlice::AppliedJobs), 1);
        assert_eq!(h.notifications.count(), 0);
    }

    #[tokio::test]
    async fn test_first_load_failure_is_not_toasted() {
        let h = harness(
            CollectionSpec::COMPANIES,
            ScriptedApi::failing(ClientError::connectivity()),
        );

        let first = h.sync.mount(&Identity::Absent).await;
        assert!(matches!(
            first,
            Some(RefreshOutcome::Completed(FetchOutcome::Failed(_)))
        ));
        assert_eq!(h.notifications.count(), 0);

        h.sync.refresh(false).await;
        assert_eq!(h.notifications.count(), 1);
        assert_eq!(
            h.notifications.messages(),
            vec!["Failed to fetch companies".to_string()]
        );
    }

    #[tokio::test]
    async fn test_error_retains_items_and_reports_backend_message() {
        let h = harness(
            CollectionSpec::ADMIN_JOBS,
            ScriptedApi::ok(json!({"success": true, "jobs": [{"_id": "j1"}]})),
        );
        h.sync.mount(&Identity::Absent).await;

        h.api
            .set_reply(Err(ClientError::server(500, "Database unavailable")));
        let outcome = h.sync.refresh(false).await;

        assert!(matches!(
            outcome,
            RefreshOutcome::Completed(FetchOutcome::Failed(ClientError::Server { status: 500, .. }))
        ));
        assert_eq!(h.sync.items().len(), 1);
        assert_eq!(h.store.len(StoreSlice::AdminJobs), 1);
        assert_eq!(
            h.notifications.messages(),
            vec!["Database unavailable".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_saved_jobs_error_clears_and_notifies() {
        let h = harness(
            CollectionSpec::SAVED_JOBS,
            ScriptedApi::ok(json!({"success": true, "savedJobs": [{"id": "a"}]})),
        );
        mount_and_settle(&h, &Identity::present("u1")).await;

        h.api.set_reply(Err(ClientError::connectivity()));
        sleep(Duration::from_secs(2)).await;
        h.sync.refresh(false).await;
        settle().await;

        assert!(h.sync.items().is_empty());
        assert!(h.store.snapshot(StoreSlice::SavedJobs).is_empty());
        assert_eq!(
            h.notifications.messages(),
            vec!["Failed to fetch saved jobs".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_failure_notifies_once_even_on_first_load() {
        let h = harness(
            CollectionSpec::SAVED_JOBS,
            ScriptedApi::failing(ClientError::Session(SessionFailure::new(
                SessionFailureKind::TokenExpired,
                "Token expired",
            ))),
        );

        mount_and_settle(&h, &Identity::present("u1")).await;

        let sent = h.notifications.notifications.lock().clone();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].session_expired);
        assert_eq!(sent[0].message, "Token expired");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_out_during_flight_discards_response() {
        let h = harness(
            CollectionSpec::APPLIED_JOBS,
            ScriptedApi::ok(json!({"success": true, "application": [{"_id": "a"}]})),
        );
        h.api.hold_responses();

        h.sync.mount(&Identity::present("u1")).await;
        settle().await;
        assert!(h.sync.is_loading());

        h.sync.on_identity_change(Identity::Absent).await;
        h.api.release_one();
        settle().await;

        assert!(!h.sync.is_loading());
        assert!(h.sync.items().is_empty());
        assert!(h.store.is_empty(StoreSlice::AppliedJobs));
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_cancels_pending_fetch() {
        let h = harness(
            CollectionSpec::SAVED_JOBS,
            ScriptedApi::ok(json!({"success": true, "savedJobs": [{"id": "a"}]})),
        );

        h.sync.mount(&Identity::present("u1")).await;
        h.sync.teardown();
        settle().await;

        assert_eq!(h.api.calls(), 0);
        assert!(!h.sync.is_live());
        assert!(!h.sync.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_discards_in_flight_response() {
        let h = harness(
            CollectionSpec::SAVED_JOBS,
            ScriptedApi::ok(json!({"success": true, "savedJobs": [{"id": "a"}]})),
        );
        h.api.hold_responses();

        h.sync.mount(&Identity::present("u1")).await;
        settle().await;
        h.sync.teardown();
        h.api.release_one();
        settle().await;

        assert_eq!(h.api.calls(), 1);
        assert!(h.sync.items().is_empty());
        assert!(h.store.is_empty(StoreSlice::SavedJobs));
    }

    #[tokio::test(start_paused = true)]
    async fn test_user_switch_reloads() {
        let h = harness(
            CollectionSpec::SAVED_JOBS,
            ScriptedApi::ok(json!({"success": true, "savedJobs": [{"id": "a"}]})),
        );
        mount_and_settle(&h, &Identity::present("u1")).await;

        h.api.set_reply(Ok(crate::domain::ApiResponse::ok(
            json!({"success": true, "savedJobs": [{"id": "b"}, {"id": "c"}]}),
        )));
        let outcome = h.sync.on_identity_change(Identity::present("u2")).await;
        assert_eq!(outcome, Some(RefreshOutcome::Scheduled));
        assert!(h.store.is_empty(StoreSlice::SavedJobs));
        settle().await;

        assert_eq!(h.store.len(StoreSlice::SavedJobs), 2);
        assert_eq!(h.api.calls(), 2);
    }

    #[tokio::test]
    async fn test_identity_agnostic_collection_ignores_identity() {
        let h = harness(
            CollectionSpec::COMPANIES,
            ScriptedApi::ok(json!({"success": true, "companies": [{"_id": "c1"}]})),
        );
        h.sync.mount(&Identity::present("u1")).await;

        assert_eq!(h.sync.on_identity_change(Identity::Absent).await, None);
        assert_eq!(h.store.len(StoreSlice::Companies), 1);
        assert_eq!(h.api.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_bypass_adds_timestamp_parameter() {
        let h = harness(
            CollectionSpec::COMPANIES,
            ScriptedApi::ok(json!({"success": true, "companies": []})),
        );
        h.sync.mount(&Identity::Absent).await;
        h.sync.refresh(true).await;

        let requests = h.api.requests();
        assert!(!requests[0].cache_bypass());
        assert!(requests[1].cache_bypass());
        assert_eq!(requests[1].query()[0].0, "_");
    }

    #[tokio::test]
    async fn test_empty_success_differs_from_unfetched() {
        let h = harness(
            CollectionSpec::COMPANIES,
            ScriptedApi::ok(json!({"success": true, "companies": []})),
        );
        assert!(!h.sync.state().is_fetched());

        h.sync.mount(&Identity::Absent).await;

        assert!(h.sync.state().is_fetched());
        assert!(h.sync.items().is_empty());
        assert_eq!(h.sync.phase(), SyncPhase::Idle(Some(LastOutcome::Succeeded)));
    }
    #[tokio::test(start_paused = true)]
    async fn test_quick_relogin_reloads_after_stale_response() {
        let h = harness(
            CollectionSpec::SAVED_JOBS,
            ScriptedApi::ok(json!({"success": true, "savedJobs": [{"id": "a"}]})),
        );
        h.api.hold_responses();

        h.sync.mount(&Identity::present("u1")).await;
        settle().await;
        h.sync.on_identity_change(Identity::Absent).await;
        let outcome = h.sync.on_identity_change(Identity::present("u1")).await;
        assert_eq!(outcome, Some(RefreshOutcome::InFlight));

        h.api.release_one();
        h.api.release_one();
        sleep(Duration::from_secs(5)).await;

        assert_eq!(h.api.calls(), 2);
        assert_eq!(h.sync.items().len(), 1);
        assert_eq!(h.store.len(StoreSlice::SavedJobs), 1);
        assert!(!h.sync.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_during_flight_loads_new_user() {
        let h = harness(
            CollectionSpec::APPLIED_JOBS,
            ScriptedApi::ok(json!({"success": true, "application": [{"_id": "old"}]})),
        );
        h.api.hold_responses();

        h.sync.mount(&Identity::present("u1")).await;
        settle().await;
        h.api.set_reply(Ok(crate::domain::ApiResponse::ok(
            json!({"success": true, "application": [{"_id": "new1"}, {"_id": "new2"}]}),
        )));
        h.sync.on_identity_change(Identity::present("u2")).await;

        h.api.release_one();
        h.api.release_one();
        sleep(Duration::from_secs(5)).await;

        let ids: Vec<_> = h
            .store
            .snapshot(StoreSlice::AppliedJobs)
            .iter()
            .filter_map(|e| e.id().map(ToString::to_string))
            .collect();
        assert_eq!(ids, vec!["new1", "new2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_out_after_stale_fetch_owes_nothing() {
        let h = harness(
            CollectionSpec::SAVED_JOBS,
            ScriptedApi::ok(json!({"success": true, "savedJobs": [{"id": "a"}]})),
        );
        h.api.hold_responses();

        h.sync.mount(&Identity::present("u1")).await;
        settle().await;
        h.sync.on_identity_change(Identity::Absent).await;
        h.sync.on_identity_change(Identity::present("u1")).await;
        h.sync.on_identity_change(Identity::Absent).await;

        h.api.release_one();
        sleep(Duration::from_secs(5)).await;

        assert_eq!(h.api.calls(), 1);
        assert!(h.store.is_empty(StoreSlice::SavedJobs));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_without_collection_key_follows_payload_policy() {
        let h = harness(
            CollectionSpec::SAVED_JOBS,
            ScriptedApi::ok(json!({"success": true, "savedJobs": [{"id": "a"}]})),
        );
        mount_and_settle(&h, &Identity::present("u1")).await;

        h.api
            .set_reply(Ok(crate::domain::ApiResponse::ok(json!({"success": true}))));
        sleep(Duration::from_secs(2)).await;
        h.sync.refresh(false).await;
        settle().await;

        assert!(h.store.is_empty(StoreSlice::SavedJobs));
        assert_eq!(h.sync.phase(), SyncPhase::Idle(Some(LastOutcome::Failed)));
        assert_eq!(h.notifications.count(), 0);
    }

    #[tokio::test]
    async fn test_missing_collection_key_keeps_retained_items() {
        let h = harness(
            CollectionSpec::COMPANIES,
            ScriptedApi::ok(json!({"success": true, "companies": [{"_id": "c1"}]})),
        );
        h.sync.mount(&Identity::Absent).await;

        h.api.set_reply(Ok(crate::domain::ApiResponse::ok(
            json!({"success": true, "company": []}),
        )));
        let outcome = h.sync.refresh(false).await;

        assert_eq!(
            outcome,
            RefreshOutcome::Completed(FetchOutcome::Rejected { message: None })
        );
        assert_eq!(h.store.len(StoreSlice::Companies), 1);
    }
}
