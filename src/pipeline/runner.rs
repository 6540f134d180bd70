//! End-to-end counting pipeline and its external control surface.
//!
//! One pipeline instance owns one video stream's engine state. Exactly one
//! frame is in flight at a time and frames are processed in capture order.
//! External mutations (reset, capacity, config reload) arrive over a
//! command channel and are applied between frames, never concurrently with
//! engine state.

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::counting::{CrossingEvent, OccupancyAggregator, OccupancySnapshot};
use crate::error::ConfigError;
use crate::tracker::VehicleTracker;

use super::detector::{DetectionSource, FrameDetections};
use super::queue::FrameConsumer;
use super::sink::{EventSink, SnapshotSink};
use super::snapshot::SharedSnapshot;

enum EngineCommand {
    ResetCounts,
    SetMaxCapacity(u32),
    ApplyConfig(Box<EngineConfig>),
}

/// Clonable handle for external control operations.
///
/// Commands are validated here, at the trust boundary, then handed to the
/// pipeline over a channel and applied at the next frame boundary. Invalid
/// values never reach engine state.
#[derive(Clone)]
pub struct ControlHandle {
    tx: Sender<EngineCommand>,
}

impl ControlHandle {
    /// Zero the entry/exit totals. Capacity and live tracks are untouched.
    pub fn reset_counts(&self) {
        let _ = self.tx.send(EngineCommand::ResetCounts);
    }

    /// Request a capacity change. Rejects non-positive values.
    pub fn set_max_capacity(&self, max_capacity: u32) -> Result<(), ConfigError> {
        if max_capacity == 0 {
            return Err(ConfigError::NonPositiveCapacity(max_capacity));
        }
        let _ = self.tx.send(EngineCommand::SetMaxCapacity(max_capacity));
        Ok(())
    }

    /// Hot-reload the full configuration. Rejected configurations leave the
    /// engine on its last valid values.
    pub fn apply_config(&self, config: EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let _ = self.tx.send(EngineCommand::ApplyConfig(Box::new(config)));
        Ok(())
    }
}

/// What one processed frame produced.
#[derive(Debug)]
pub struct FrameSummary {
    /// Crossing events finalized on this frame, in emission order
    pub events: Vec<CrossingEvent>,
    /// Tracks currently in the arena
    pub active_tracks: usize,
    /// Tracks currently eligible for counting
    pub confirmed_tracks: usize,
}

/// A combined pipeline bundling detection inference with tracking,
/// counting and snapshot publication.
pub struct CountingPipeline<D: DetectionSource> {
    detector: D,
    tracker: VehicleTracker,
    aggregator: OccupancyAggregator,
    shared: SharedSnapshot,
    event_sinks: Vec<Box<dyn EventSink>>,
    snapshot_sinks: Vec<Box<dyn SnapshotSink>>,
    commands: Receiver<EngineCommand>,
    control: ControlHandle,
    publish_interval_frames: u32,
    frames_since_publish: u32,
}

impl<D: DetectionSource> CountingPipeline<D> {
    /// Create a pipeline from a detector and a validated configuration.
    pub fn new(detector: D, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let aggregator = OccupancyAggregator::with_initial_occupancy(
            config.parking.max_capacity,
            config.parking.initial_occupancy_percent,
        )?;
        let (tx, commands) = unbounded();
        let pipeline = Self {
            detector,
            tracker: VehicleTracker::new(config.tracker_config()),
            aggregator,
            shared: SharedSnapshot::new(),
            event_sinks: Vec::new(),
            snapshot_sinks: Vec::new(),
            commands,
            control: ControlHandle { tx },
            publish_interval_frames: config.pipeline.publish_interval_frames,
            frames_since_publish: 0,
        };
        // Dashboards see a snapshot before the first frame arrives
        pipeline.shared.publish(pipeline.aggregator.snapshot());
        Ok(pipeline)
    }

    /// Create a pipeline with the default configuration.
    pub fn with_default_config(detector: D) -> Self {
        Self::new(detector, EngineConfig::default())
            .expect("default configuration is always valid")
    }

    /// Handle for external control operations (web/API thread).
    pub fn control(&self) -> ControlHandle {
        self.control.clone()
    }

    /// Handle for snapshot readers (dashboard, storage).
    pub fn snapshot_handle(&self) -> SharedSnapshot {
        self.shared.clone()
    }

    /// Register a storage collaborator for the event log.
    pub fn add_event_sink(&mut self, sink: Box<dyn EventSink>) {
        self.event_sinks.push(sink);
    }

    /// Register a collaborator for published snapshots.
    pub fn add_snapshot_sink(&mut self, sink: Box<dyn SnapshotSink>) {
        self.snapshot_sinks.push(sink);
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &VehicleTracker {
        &self.tracker
    }

    /// Run detection on a frame and feed the result through the engine.
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
        frame_index: u64,
    ) -> Result<FrameSummary, D::Error> {
        let boxes = self.detector.detect(input, width, height)?;
        Ok(self.ingest(&FrameDetections {
            boxes,
            width,
            height,
            frame_index,
        }))
    }

    /// Feed already-computed detections through the engine. This is the
    /// consumer end of a pipelined deployment where inference runs on a
    /// separate worker.
    pub fn ingest(&mut self, frame: &FrameDetections) -> FrameSummary {
        self.drain_commands();

        let events = self
            .tracker
            .update(&frame.boxes, frame.width, frame.height, frame.frame_index);

        self.frames_since_publish += 1;
        for event in &events {
            info!(
                track_id = event.track_id,
                kind = ?event.kind,
                frame_index = event.frame_index,
                "counting event"
            );
            let snapshot = self.aggregator.apply(event);
            self.forward_event(event);
            self.publish(snapshot);
        }
        if events.is_empty() && self.frames_since_publish >= self.publish_interval_frames {
            let snapshot = self.aggregator.snapshot();
            self.publish(snapshot);
        }

        FrameSummary {
            events,
            active_tracks: self.tracker.active_tracks().len(),
            confirmed_tracks: self.tracker.confirmed_count(),
        }
    }

    /// Consume frames from a hand-off queue until every producer is gone.
    pub fn run(&mut self, frames: &FrameConsumer) {
        while let Some(frame) = frames.recv() {
            self.ingest(&frame);
        }
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            match command {
                EngineCommand::ResetCounts => {
                    self.aggregator.reset_counts();
                    info!("entry/exit totals reset");
                    let snapshot = self.aggregator.snapshot();
                    self.publish(snapshot);
                }
                EngineCommand::SetMaxCapacity(max_capacity) => {
                    match self.aggregator.set_max_capacity(max_capacity) {
                        Ok(()) => {
                            info!(max_capacity, "capacity updated");
                            let snapshot = self.aggregator.snapshot();
                            self.publish(snapshot);
                        }
                        Err(error) => warn!(%error, "rejected capacity update"),
                    }
                }
                EngineCommand::ApplyConfig(config) => match config.validate() {
                    Ok(()) => {
                        self.tracker.set_config(config.tracker_config());
                        // Already range-checked by validate()
                        let _ = self
                            .aggregator
                            .set_max_capacity(config.parking.max_capacity);
                        self.publish_interval_frames = config.pipeline.publish_interval_frames;
                        info!("configuration reloaded");
                    }
                    Err(error) => warn!(%error, "rejected configuration reload"),
                },
            }
        }
    }

    fn forward_event(&mut self, event: &CrossingEvent) {
        for sink in &mut self.event_sinks {
            if let Err(error) = sink.on_event(event) {
                warn!(%error, track_id = event.track_id, "event sink failed");
            }
        }
    }

    fn publish(&mut self, snapshot: OccupancySnapshot) {
        for sink in &mut self.snapshot_sinks {
            if let Err(error) = sink.on_snapshot(&snapshot) {
                warn!(%error, "snapshot sink failed");
            }
        }
        self.shared.publish(snapshot);
        self.frames_since_publish = 0;
    }
}
