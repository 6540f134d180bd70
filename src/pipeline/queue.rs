//! Bounded FIFO frame hand-off between the detection stage and the engine.
//!
//! The queue is the backpressure point of the pipeline. For a live
//! monitoring feed staleness is worse than loss, so overflow drops the
//! oldest queued frame rather than blocking the producer or growing without
//! bound. Frames are never reordered or duplicated; the consumer side is
//! single-consumer by construction.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use tracing::warn;

use super::detector::FrameDetections;

/// Create a frame queue holding at most `depth` frames. Depth 1 or 2 is the
/// expected configuration.
pub fn frame_queue(depth: usize) -> (FrameProducer, FrameConsumer) {
    let (tx, rx) = bounded(depth.max(1));
    (
        FrameProducer {
            tx,
            rx: rx.clone(),
        },
        FrameConsumer { rx },
    )
}

/// Producer half, held by the detection stage.
pub struct FrameProducer {
    tx: Sender<FrameDetections>,
    // Kept to evict the oldest frame on overflow
    rx: Receiver<FrameDetections>,
}

impl FrameProducer {
    /// Enqueue a frame, evicting the oldest queued frame if the queue is
    /// full. Returns the number of frames dropped to make room.
    pub fn push(&self, frame: FrameDetections) -> usize {
        let mut dropped = 0;
        let mut frame = frame;
        loop {
            match self.tx.try_send(frame) {
                Ok(()) => return dropped,
                Err(TrySendError::Full(returned)) => {
                    if let Ok(stale) = self.rx.try_recv() {
                        warn!(
                            frame_index = stale.frame_index,
                            "frame queue full, dropping oldest frame"
                        );
                        dropped += 1;
                    }
                    frame = returned;
                }
                Err(TrySendError::Disconnected(_)) => {
                    warn!("frame consumer disconnected, discarding frame");
                    return dropped;
                }
            }
        }
    }
}

/// Consumer half, held by the engine loop.
pub struct FrameConsumer {
    rx: Receiver<FrameDetections>,
}

impl FrameConsumer {
    /// Block until the next frame arrives, or return `None` once every
    /// producer is gone.
    pub fn recv(&self) -> Option<FrameDetections> {
        self.rx.recv().ok()
    }

    /// Take a frame if one is queued.
    pub fn try_recv(&self) -> Option<FrameDetections> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(frame_index: u64) -> FrameDetections {
        FrameDetections {
            boxes: vec![],
            width: 640,
            height: 480,
            frame_index,
        }
    }

    #[test]
    fn test_fifo_order() {
        let (producer, consumer) = frame_queue(4);
        producer.push(frame(1));
        producer.push(frame(2));
        producer.push(frame(3));
        assert_eq!(consumer.recv().unwrap().frame_index, 1);
        assert_eq!(consumer.recv().unwrap().frame_index, 2);
        assert_eq!(consumer.recv().unwrap().frame_index, 3);
    }

    #[test]
    fn test_overflow_drops_oldest() {
        let (producer, consumer) = frame_queue(2);
        assert_eq!(producer.push(frame(1)), 0);
        assert_eq!(producer.push(frame(2)), 0);
        // Queue full: frame 1 is evicted to make room for frame 3
        assert_eq!(producer.push(frame(3)), 1);

        assert_eq!(consumer.recv().unwrap().frame_index, 2);
        assert_eq!(consumer.recv().unwrap().frame_index, 3);
        assert!(consumer.try_recv().is_none());
    }
}
