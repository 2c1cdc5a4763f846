//! Shared store port definition.

use crate::domain::entities::{Entity, StoreSlice};

/// Process-wide state container mirrored by the synchronizers.
///
/// Every write replaces a whole slice; slices are never merged.
pub trait SharedStorePort: Send + Sync {
    /// Replaces the contents of `slice`.
    fn replace(&self, slice: StoreSlice, items: Vec<Entity>);

    /// Returns a copy of the contents of `slice`.
    fn snapshot(&self, slice: StoreSlice) -> Vec<Entity>;

    /// Empties `slice`.
    fn clear(&self, slice: StoreSlice) {
        self.replace(slice, Vec::new());
    }
}
