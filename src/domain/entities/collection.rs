//! Per-collection synchronization parameters.

use std::fmt;

/// Slice of the shared store owned by one synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreSlice {
    /// Jobs the signed-in user applied to.
    AppliedJobs,
    /// Jobs the signed-in user bookmarked.
    SavedJobs,
    /// Companies registered by the admin.
    Companies,
    /// Jobs posted by the admin.
    AdminJobs,
}

impl StoreSlice {
    /// Returns the slice key as used by the host's store.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::AppliedJobs => "allAppliedJobs",
            Self::SavedJobs => "savedJobs",
            Self::Companies => "companies",
            Self::AdminJobs => "allAdminJobs",
        }
    }
}

impl fmt::Display for StoreSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// What to do with existing items when a fetch does not produce new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Keep the last successfully fetched items.
    Retain,
    /// Drop items locally and in the store.
    Clear,
}

/// Static description of one synchronized collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionSpec {
    /// Human readable name, used as notification title.
    pub name: &'static str,
    /// Request path relative to the API origin.
    pub path: &'static str,
    /// Key of the item array in the response envelope.
    pub envelope_key: &'static str,
    /// Store slice mirrored by this collection.
    pub slice: StoreSlice,
    /// Whether the collection belongs to the signed-in user.
    pub identity_scoped: bool,
    /// Whether refreshes go through the debouncing scheduler.
    pub scheduled: bool,
    /// Reaction to a `success: false` payload.
    pub payload_failure: FailurePolicy,
    /// Reaction to a transport or HTTP failure.
    pub error_policy: FailurePolicy,
    /// Notification text when the backend gives no message.
    pub default_error: &'static str,
}

impl CollectionSpec {
    /// Applications of the signed-in user.
    pub const APPLIED_JOBS: Self = Self {
        name: "Applied jobs",
        path: "/application/get",
        envelope_key: "application",
        slice: StoreSlice::AppliedJobs,
        identity_scoped: true,
        scheduled: true,
        payload_failure: FailurePolicy::Retain,
        error_policy: FailurePolicy::Retain,
        default_error: "Failed to fetch applied jobs",
    };

    /// Jobs bookmarked by the signed-in user.
    pub const SAVED_JOBS: Self = Self {
        name: "Saved jobs",
        path: "/job/saved",
        envelope_key: "savedJobs",
        slice: StoreSlice::SavedJobs,
        identity_scoped: true,
        scheduled: true,
        payload_failure: FailurePolicy::Clear,
        error_policy: FailurePolicy::Clear,
        default_error: "Failed to fetch saved jobs",
    };

    /// Companies visible to the admin.
    pub const COMPANIES: Self = Self {
        name: "Companies",
        path: "/company",
        envelope_key: "companies",
        slice: StoreSlice::Companies,
        identity_scoped: false,
        scheduled: false,
        payload_failure: FailurePolicy::Retain,
        error_policy: FailurePolicy::Retain,
        default_error: "Failed to fetch companies",
    };

    /// Jobs posted by the admin.
    pub const ADMIN_JOBS: Self = Self {
        name: "Admin jobs",
        path: "/job/getadminjobs",
        envelope_key: "jobs",
        slice: StoreSlice::AdminJobs,
        identity_scoped: false,
        scheduled: false,
        payload_failure: FailurePolicy::Retain,
        error_policy: FailurePolicy::Retain,
        default_error: "Failed to fetch admin jobs",
    };

    /// All collections in mount order.
    pub const ALL: [Self; 4] = [
        Self::APPLIED_JOBS,
        Self::SAVED_JOBS,
        Self::COMPANIES,
        Self::ADMIN_JOBS,
    ];

    /// Looks up a collection by its store slice.
    #[must_use]
    pub fn for_slice(slice: StoreSlice) -> Self {
        match slice {
            StoreSlice::AppliedJobs => Self::APPLIED_JOBS,
            StoreSlice::SavedJobs => Self::SAVED_JOBS,
            StoreSlice::Companies => Self::COMPANIES,
            StoreSlice::AdminJobs => Self::ADMIN_JOBS,
        }
    }
}
