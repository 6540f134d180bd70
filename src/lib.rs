//! Tracking and counting engine for camera-based parking lot monitoring.
//!
//! The crate turns a noisy stream of per-frame vehicle detections into
//! de-duplicated entry/exit counts and an authoritative occupancy snapshot:
//!
//! - [`tracker`] associates detections across frames into persistent tracks
//!   and runs each track's lifecycle state machine.
//! - [`counting`] converts confirmed-track line crossings into exactly-once
//!   [`CrossingEvent`]s and aggregates them into the published
//!   [`OccupancySnapshot`].
//! - [`pipeline`] wires a [`DetectionSource`] backend, the engine, the
//!   collaborator sinks and the external control surface together, one
//!   frame in flight at a time.
//!
//! Detection inference, persistence and the dashboard are external
//! collaborators reached through traits; the engine never depends on their
//! success to keep processing frames.

pub mod config;
pub mod counting;
pub mod error;
pub mod pipeline;
pub mod tracker;

pub use config::EngineConfig;
pub use counting::{
    CrossingEvent, CrossingKind, OccupancyAggregator, OccupancySnapshot,
};
pub use error::ConfigError;
pub use pipeline::{
    ControlHandle, CountingPipeline, DetectionSource, FrameDetections, SharedSnapshot,
};
pub use tracker::{BoundingBox, Track, TrackState, TrackerConfig, VehicleTracker};
