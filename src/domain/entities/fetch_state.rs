//! Fetch lifecycle state of a single synchronizer.

use std::time::Instant;

use super::Entity;

/// How the last completed fetch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastOutcome {
    /// Items were replaced from the server.
    Succeeded,
    /// The fetch failed or the payload was rejected.
    Failed,
}

/// Observable phase of a synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// No request outstanding; carries the outcome of the last completed fetch.
    Idle(Option<LastOutcome>),
    /// A request is in flight.
    Fetching,
}

/// Items and bookkeeping owned by one synchronizer.
#[derive(Debug, Clone, Default)]
pub struct FetchState {
    /// A request is in flight.
    pub loading: bool,
    /// Completion time of the last successful fetch; `None` if never fetched.
    pub last_fetch: Option<Instant>,
    /// Items of the last successful fetch, in server order.
    pub items: Vec<Entity>,
    /// Outcome of the last completed fetch.
    pub last_outcome: Option<LastOutcome>,
}

impl FetchState {
    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> SyncPhase {
        if self.loading {
            SyncPhase::Fetching
        } else {
            SyncPhase::Idle(self.last_outcome)
        }
    }

    /// Returns whether a successful fetch has ever completed.
    #[must_use]
    pub const fn is_fetched(&self) -> bool {
        self.last_fetch.is_some()
    }

    /// Marks a request as started. Returns `false` if one is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        true
    }

    /// Replaces items with a successful result.
    pub fn succeed(&mut self, items: Vec<Entity>) {
        self.items = items;
        self.last_fetch = Some(Instant::now());
        self.last_outcome = Some(LastOutcome::Succeeded);
        self.loading = false;
    }

    /// Ends a request without touching items.
    pub fn fail(&mut self) {
        self.last_outcome = Some(LastOutcome::Failed);
        self.loading = false;
    }

    /// Ends a request and drops items.
    pub fn fail_and_clear(&mut self) {
        self.items.clear();
        self.last_fetch = None;
        self.fail();
    }

    /// Drops items and history but keeps the in-flight marker.
    ///
    /// A request that is still outstanding keeps the `loading` guard so no
    /// second request can start before it settles.
    pub fn reset(&mut self) {
        let loading = self.loading;
        *self = Self {
            loading,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_begin_guards_in_flight() {
        let mut state = FetchState::default();
        assert!(state.begin());
        assert!(!state.begin());
        assert_eq!(state.phase(), SyncPhase::Fetching);
    }

    #[test]
    fn test_empty_success_is_distinct_from_unfetched() {
        let mut state = FetchState::default();
        assert!(!state.is_fetched());

        state.begin();
        state.succeed(Vec::new());

        assert!(state.is_fetched());
        assert!(state.items.is_empty());
        assert_eq!(state.phase(), SyncPhase::Idle(Some(LastOutcome::Succeeded)));
    }

    #[test]
    fn test_fail_retains_items() {
        let mut state = FetchState::default();
        state.begin();
        state.succeed(vec![Entity::new(json!({"id": "a"}))]);

        state.begin();
        state.fail();

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.phase(), SyncPhase::Idle(Some(LastOutcome::Failed)));
    }

    #[test]
    fn test_reset_keeps_loading_marker() {
        let mut state = FetchState::default();
        state.begin();
        state.items.push(Entity::new(json!({"id": "a"})));

        state.reset();

        assert!(state.loading);
        assert!(state.items.is_empty());
        assert!(state.last_outcome.is_none());
    }
}
