//! In-process shared store.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::trace;

use crate::domain::entities::{Entity, StoreSlice};
use crate::domain::ports::SharedStorePort;

/// Shared store keeping one item list per slice in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    slices: RwLock<HashMap<StoreSlice, Vec<Entity>>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of items in `slice`.
    #[must_use]
    pub fn len(&self, slice: StoreSlice) -> usize {
        self.slices.read().get(&slice).map_or(0, Vec::len)
    }

    /// Returns whether `slice` holds no items.
    #[must_use]
    pub fn is_empty(&self, slice: StoreSlice) -> bool {
        self.len(slice) == 0
    }

    /// Renders all slices as a JSON object keyed by slice key.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let slices = self.slices.read();
        let map: Map<String, Value> = slices
            .iter()
            .map(|(slice, items)| {
                let values = items.iter().map(|e| e.as_value().clone()).collect();
                (slice.key().to_string(), Value::Array(values))
            })
            .collect();
        Value::Object(map)
    }
}

impl SharedStorePort for InMemoryStore {
    fn replace(&self, slice: StoreSlice, items: Vec<Entity>) {
        trace!(%slice, count = items.len(), "Replacing store slice");
        self.slices.write().insert(slice, items);
    }

    fn snapshot(&self, slice: StoreSlice) -> Vec<Entity> {
        self.slices.read().get(&slice).cloned().unwrap_or_default()
    }
}
