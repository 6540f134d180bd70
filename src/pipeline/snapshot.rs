//! Latest-snapshot publication handle.

use std::sync::{Arc, PoisonError, RwLock};

use crate::counting::OccupancySnapshot;

/// Shared handle to the most recently published occupancy snapshot.
///
/// This is the engine's "subscribe to snapshot" capability: the aggregator
/// replaces the whole snapshot atomically and readers (dashboard, storage)
/// take an `Arc` to a complete, immutable value. How a collaborator delivers
/// it onward (push socket, poll endpoint) is its own concern.
#[derive(Clone, Default)]
pub struct SharedSnapshot {
    inner: Arc<RwLock<Option<Arc<OccupancySnapshot>>>>,
}

impl SharedSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published snapshot. Readers never observe a partial
    /// update; they hold either the previous or the new `Arc`.
    pub fn publish(&self, snapshot: OccupancySnapshot) {
        let mut slot = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::new(snapshot));
    }

    /// The latest published snapshot, or `None` before the first
    /// publication.
    pub fn latest(&self) -> Option<Arc<OccupancySnapshot>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_read() {
        let shared = SharedSnapshot::new();
        assert!(shared.latest().is_none());

        shared.publish(OccupancySnapshot::compute(3, 1, 10));
        let reader = shared.clone();
        let snapshot = reader.latest().unwrap();
        assert_eq!(snapshot.occupied, 2);

        // A held Arc survives the next publication unchanged
        shared.publish(OccupancySnapshot::compute(4, 1, 10));
        assert_eq!(snapshot.occupied, 2);
        assert_eq!(reader.latest().unwrap().occupied, 3);
    }
}
