//! Collaborator seams for durable storage and dashboard delivery.
//!
//! The engine forwards every crossing event and published snapshot to the
//! registered sinks but never depends on them succeeding: a sink failure is
//! logged by the pipeline and frame processing continues. Retry and
//! durability are the collaborator's responsibility.

use crate::counting::{CrossingEvent, OccupancySnapshot};

/// Receives every crossing event, in emission order (append-only log).
pub trait EventSink: Send {
    fn on_event(&mut self, event: &CrossingEvent) -> anyhow::Result<()>;
}

/// Receives every published snapshot (latest-value overwrite).
pub trait SnapshotSink: Send {
    fn on_snapshot(&mut self, snapshot: &OccupancySnapshot) -> anyhow::Result<()>;
}
