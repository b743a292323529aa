// Single-slot cache for the latest snapshot.
// One writer (the collector) swaps the slot once per tick; any number of
// readers clone the Arc out. Snapshots are immutable after construction,
// so a reader always observes either the previous or the new snapshot.

use crate::models::Snapshot;
use std::sync::{Arc, RwLock};

#[derive(Default)]
pub struct SnapshotCache {
    slot: RwLock<Option<Arc<Snapshot>>>,
}

impl SnapshotCache {
    /// Starts empty; `read` returns `None` until the first publish.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached snapshot. Writer holds the lock only for the
    /// pointer swap.
    pub fn publish(&self, snapshot: Snapshot) {
        let mut slot = self
            .slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(Arc::new(snapshot));
    }

    /// Latest snapshot, or `None` before the first successful tick.
    pub fn read(&self) -> Option<Arc<Snapshot>> {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
