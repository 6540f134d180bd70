//! Occupancy aggregation and snapshot computation.
//!
//! The aggregator consumes crossing events in emission order and advances
//! the monotonic totals by exactly one per event. The published snapshot is
//! always recomputed from the totals by a pure function, never incrementally
//! adjusted, so it cannot drift from them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::counting::event::{CrossingEvent, CrossingKind};
use crate::error::ConfigError;

/// Derived, published state of current parking usage. The single source of
/// truth read by the dashboard collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancySnapshot {
    pub occupied: u32,
    pub available: u32,
    pub max_capacity: u32,
    pub occupancy_percent: f32,
    pub total_entries: u64,
    pub total_exits: u64,
    pub timestamp: DateTime<Utc>,
}

impl OccupancySnapshot {
    /// Pure snapshot computation from the monotonic totals.
    ///
    /// `occupied` is the entry/exit difference clamped to `[0, max_capacity]`;
    /// recomputing with the same inputs always yields the same result
    /// (timestamps aside).
    pub fn compute(total_entries: u64, total_exits: u64, max_capacity: u32) -> Self {
        let raw = total_entries as i64 - total_exits as i64;
        let occupied = raw.clamp(0, max_capacity as i64) as u32;
        let available = max_capacity - occupied;
        let occupancy_percent = if max_capacity > 0 {
            (occupied as f32 / max_capacity as f32 * 1000.0).round() / 10.0
        } else {
            0.0
        };
        Self {
            occupied,
            available,
            max_capacity,
            occupancy_percent,
            total_entries,
            total_exits,
            timestamp: Utc::now(),
        }
    }
}

/// Consumes the ordered crossing-event stream and maintains the
/// authoritative occupancy state.
#[derive(Debug, Clone)]
pub struct OccupancyAggregator {
    total_entries: u64,
    total_exits: u64,
    max_capacity: u32,
}

impl OccupancyAggregator {
    /// Create an aggregator for a lot with `max_capacity` spaces.
    /// Capacity must be positive.
    pub fn new(max_capacity: u32) -> Result<Self, ConfigError> {
        if max_capacity == 0 {
            return Err(ConfigError::NonPositiveCapacity(max_capacity));
        }
        Ok(Self {
            total_entries: 0,
            total_exits: 0,
            max_capacity,
        })
    }

    /// Create an aggregator pre-seeded so that `occupied` starts at
    /// `initial_occupancy_percent` of capacity. Seeding loads
    /// `total_entries` rather than patching the occupancy, so the snapshot
    /// stays a pure function of the totals.
    pub fn with_initial_occupancy(
        max_capacity: u32,
        initial_occupancy_percent: f32,
    ) -> Result<Self, ConfigError> {
        if !(0.0..=100.0).contains(&initial_occupancy_percent) {
            return Err(ConfigError::PercentOutOfRange {
                name: "initial_occupancy_percent",
                value: initial_occupancy_percent,
            });
        }
        let mut aggregator = Self::new(max_capacity)?;
        aggregator.total_entries =
            (max_capacity as f32 * initial_occupancy_percent / 100.0) as u64;
        Ok(aggregator)
    }

    /// Re-derive an aggregator by reducing an event slice. The totals are a
    /// fold over the append-only event log, so any stored log reproduces the
    /// aggregator state exactly.
    pub fn rebuild(max_capacity: u32, events: &[CrossingEvent]) -> Result<Self, ConfigError> {
        let mut aggregator = Self::new(max_capacity)?;
        for event in events {
            aggregator.record(event);
        }
        Ok(aggregator)
    }

    fn record(&mut self, event: &CrossingEvent) {
        match event.kind {
            CrossingKind::Entry => self.total_entries += 1,
            CrossingKind::Exit => self.total_exits += 1,
        }
    }

    /// Apply one crossing event and return the recomputed snapshot.
    pub fn apply(&mut self, event: &CrossingEvent) -> OccupancySnapshot {
        self.record(event);
        self.snapshot()
    }

    /// Recompute the current snapshot (the periodic-tick path).
    ///
    /// A raw entry/exit difference outside `[0, max_capacity]` indicates
    /// count drift (missed entries or exits); it is clamped in the published
    /// snapshot and reported as a warning, never silently corrected into the
    /// stored totals.
    pub fn snapshot(&self) -> OccupancySnapshot {
        let raw = self.total_entries as i64 - self.total_exits as i64;
        if raw < 0 {
            warn!(
                total_entries = self.total_entries,
                total_exits = self.total_exits,
                "exit count exceeds entry count, clamping occupancy to 0 (possible undercount drift)"
            );
        } else if raw > self.max_capacity as i64 {
            warn!(
                total_entries = self.total_entries,
                total_exits = self.total_exits,
                max_capacity = self.max_capacity,
                "occupancy exceeds capacity, clamping (possible overcount drift)"
            );
        }
        OccupancySnapshot::compute(self.total_entries, self.total_exits, self.max_capacity)
    }

    /// Zero the totals. Capacity is untouched, and nothing retroactively
    /// affects tracks already counted or retired.
    pub fn reset_counts(&mut self) {
        self.total_entries = 0;
        self.total_exits = 0;
    }

    /// Replace the lot capacity. Takes effect on the next snapshot
    /// computation. Rejects non-positive values.
    pub fn set_max_capacity(&mut self, max_capacity: u32) -> Result<(), ConfigError> {
        if max_capacity == 0 {
            return Err(ConfigError::NonPositiveCapacity(max_capacity));
        }
        self.max_capacity = max_capacity;
        Ok(())
    }

    pub fn max_capacity(&self) -> u32 {
        self.max_capacity
    }

    pub fn totals(&self) -> (u64, u64) {
        (self.total_entries, self.total_exits)
    }
}
