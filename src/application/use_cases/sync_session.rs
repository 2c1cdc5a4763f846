//! Session use case owning every collection synchronizer.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::application::services::{
    CollectionSynchronizer, RefreshOutcome, SchedulerPolicy, SessionNoticeGate,
};
use crate::domain::entities::{CollectionSpec, Identity, IdentityTransition, StoreSlice};
use crate::domain::ports::{ApiPort, NotificationPort, SharedStorePort};

const SETTLE_POLL: Duration = Duration::from_millis(25);

/// Drives the applied-jobs, saved-jobs, companies and admin-jobs
/// synchronizers from one identity.
pub struct SyncSession {
    synchronizers: Vec<CollectionSynchronizer>,
    identity: Mutex<Identity>,
    session_notice: Arc<SessionNoticeGate>,
}

impl SyncSession {
    /// Creates a session with one synchronizer per collection.
    #[must_use]
    pub fn new(
        api: Arc<dyn ApiPort>,
        store: Arc<dyn SharedStorePort>,
        notifications: Arc<dyn NotificationPort>,
        policy: SchedulerPolicy,
    ) -> Self {
        let session_notice = Arc::new(SessionNoticeGate::new(notifications));
        let notifications: Arc<dyn NotificationPort> = session_notice.clone();
        let synchronizers = CollectionSpec::ALL
            .into_iter()
            .map(|spec| {
                CollectionSynchronizer::new(
                    spec,
                    Arc::clone(&api),
                    Arc::clone(&store),
                    Arc::clone(&notifications),
                    policy,
                )
            })
            .collect();

        Self {
            synchronizers,
            identity: Mutex::new(Identity::Absent),
            session_notice,
        }
    }

    /// Mounts every synchronizer with `identity`.
    pub async fn mount(&self, identity: Identity) {
        info!(signed_in = identity.is_present(), "Mounting sync session");
        *self.identity.lock() = identity.clone();
        self.session_notice.rearm();
        join_all(self.synchronizers.iter().map(|s| s.mount(&identity))).await;
    }

    /// Propagates an identity change to every synchronizer.
    pub async fn set_identity(&self, identity: Identity) {
        let previous = std::mem::replace(&mut *self.identity.lock(), identity.clone());
        let transition = previous.transition_to(&identity);
        debug!(?transition, "Identity changed");
        if matches!(
            transition,
            IdentityTransition::SignedIn | IdentityTransition::Switched
        ) {
            self.session_notice.rearm();
        }
        join_all(
            self.synchronizers
                .iter()
                .map(|s| s.on_identity_change(identity.clone())),
        )
        .await;
    }

    /// Refreshes every collection.
    pub async fn refresh_all(&self, bypass_cache: bool) -> Vec<(StoreSlice, RefreshOutcome)> {
        let outcomes = join_all(self.synchronizers.iter().map(|s| s.refresh(bypass_cache))).await;
        self.synchronizers
            .iter()
            .map(|s| s.spec().slice)
            .zip(outcomes)
            .collect()
    }

    /// Waits until no synchronizer has a pending or running fetch.
    ///
    /// Returns `false` if `timeout` elapsed first.
    pub async fn settle(&self, timeout: Duration) -> bool {
        let settled = tokio::time::timeout(timeout, async {
            while self.is_busy() {
                tokio::time::sleep(SETTLE_POLL).await;
            }
        })
        .await
        .is_ok();

        if !settled {
            warn!(timeout_ms = timeout.as_millis(), "Sync session did not settle in time");
        }
        settled
    }

    /// Tears down every synchronizer.
    pub fn teardown(&self) {
        info!("Tearing down sync session");
        for synchronizer in &self.synchronizers {
            synchronizer.teardown();
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.synchronizers.iter().any(CollectionSynchronizer::is_busy)
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        self.identity.lock().clone()
    }

    /// Returns the synchronizer mirroring `slice`.
    #[must_use]
    pub fn synchronizer(&self, slice: StoreSlice) -> Option<&CollectionSynchronizer> {
        self.synchronizers.iter().find(|s| s.spec().slice == slice)
    }

    pub fn synchronizers(&self) -> impl Iterator<Item = &CollectionSynchronizer> {
        self.synchronizers.iter()
    }
}
