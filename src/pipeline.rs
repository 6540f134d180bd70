//! Pipeline plumbing for connecting detection backends to the engine.
//!
//! This module owns the seams to every external collaborator: the detection
//! adapter, the frame hand-off queue, the storage and dashboard sinks, the
//! published snapshot, and the command channel for control operations.

mod detector;
mod queue;
mod runner;
mod script;
mod sink;
mod snapshot;

pub use detector::{DetectionSource, FrameDetections};
pub use queue::{FrameConsumer, FrameProducer, frame_queue};
pub use runner::{ControlHandle, CountingPipeline, FrameSummary};
pub use script::ScriptedSource;
pub use sink::{EventSink, SnapshotSink};
pub use snapshot::SharedSnapshot;
