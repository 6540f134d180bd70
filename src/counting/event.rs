//! Counting events emitted by the crossing detector.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Direction of a counting event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingKind {
    /// A vehicle entered the lot (downward crossing of the entry line)
    Entry,
    /// A vehicle left the lot (upward crossing of the exit line)
    Exit,
}

/// A discrete, irrevocable counting decision derived from one track's
/// trajectory. Immutable once created; forwarded to the occupancy
/// aggregator and to the storage collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct CrossingEvent {
    pub track_id: u64,
    pub kind: CrossingKind,
    pub frame_index: u64,
    pub timestamp: DateTime<Utc>,
}

impl CrossingEvent {
    pub fn new(track_id: u64, kind: CrossingKind, frame_index: u64) -> Self {
        Self {
            track_id,
            kind,
            frame_index,
            timestamp: Utc::now(),
        }
    }
}
