//! Per-frame tracking engine.
//!
//! One `update` call walks a frame through the full core: input validation,
//! association, lifecycle stepping, crossing detection and retirement.
//! Frames must arrive in capture order; crossing direction is derived from
//! consecutive centroid signs and out-of-order frames would corrupt it.

use tracing::{debug, info, warn};

use crate::counting::{CrossingDetector, CrossingEvent};
use crate::tracker::bbox::BoundingBox;
use crate::tracker::matching::{self, AssignmentResult};
use crate::tracker::track::Track;

/// Configuration for the tracking engine.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Detections below this confidence are discarded before matching
    pub confidence_threshold: f32,
    /// Gating distance as a fraction of the frame diagonal
    pub gating_ratio: f32,
    /// Successful matches required to promote Tentative to Confirmed
    pub min_confirm_frames: u32,
    /// Consecutive misses tolerated before a track is retired
    pub max_misses: u32,
    /// Entry line position as a fraction of frame height
    pub entry_line_ratio: f32,
    /// Exit line position as a fraction of frame height
    pub exit_line_ratio: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            gating_ratio: 0.125,
            min_confirm_frames: 3,
            max_misses: 30,
            entry_line_ratio: 0.3,
            exit_line_ratio: 0.7,
        }
    }
}

/// Multi-object tracker with line-crossing based entry/exit counting.
///
/// Owns the arena of active tracks. Tracks are addressed by stable id; the
/// association and crossing stages receive mutable access only within one
/// `update` pass.
pub struct VehicleTracker {
    tracks: Vec<Track>,
    crossing: CrossingDetector,
    config: TrackerConfig,
}

impl VehicleTracker {
    pub fn new(config: TrackerConfig) -> Self {
        let crossing = CrossingDetector::new(config.entry_line_ratio, config.exit_line_ratio);
        Self {
            tracks: Vec::new(),
            crossing,
            config,
        }
    }

    /// Process one frame of detections, in capture order.
    ///
    /// Returns the crossing events finalized on this frame, in emission
    /// order. Counting decisions are irrevocable: the engine never sees
    /// future frames and never revises an emitted event.
    pub fn update(
        &mut self,
        boxes: &[BoundingBox],
        frame_width: u32,
        frame_height: u32,
        frame_index: u64,
    ) -> Vec<CrossingEvent> {
        // Validate at the adapter boundary; anomalies are dropped, not fatal
        let candidates: Vec<BoundingBox> = boxes
            .iter()
            .filter(|b| {
                if !b.is_valid() {
                    warn!(frame_index, bbox = ?b, "dropping malformed bounding box");
                    return false;
                }
                b.confidence >= self.config.confidence_threshold
            })
            .copied()
            .collect();

        let track_centroids: Vec<(f32, f32)> = self
            .tracks
            .iter()
            .map(|t| {
                let c = t.last_centroid();
                (c.x, c.y)
            })
            .collect();
        let track_ids: Vec<u64> = self.tracks.iter().map(|t| t.id).collect();
        let det_centroids: Vec<(f32, f32)> = candidates.iter().map(|b| b.centroid()).collect();

        let diagonal = ((frame_width as f32).powi(2) + (frame_height as f32).powi(2)).sqrt();
        let gate = self.config.gating_ratio * diagonal;

        let cost = matching::centroid_distance(&track_centroids, &det_centroids);
        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = matching::greedy_assignment(&cost, gate, &track_ids);

        let mut events = Vec::new();
        let fh = frame_height as f32;

        // Matched tracks: step the lifecycle, then evaluate crossings for
        // the ones that came out Confirmed.
        for (ti, di) in matches {
            let det = &candidates[di];
            let track = &mut self.tracks[ti];
            let eligible = track.record_match(
                det.centroid(),
                frame_index,
                det.confidence,
                self.config.min_confirm_frames,
            );
            if eligible {
                events.extend(self.crossing.evaluate(track, fh, frame_index));
            }
        }

        // Unmatched tracks accrue a miss; retirement is the only
        // destructive outcome and is fully determined by the counter.
        for ti in unmatched_tracks {
            let track = &mut self.tracks[ti];
            track.record_miss(self.config.max_misses);
            if track.is_retired() {
                info!(track_id = track.id, misses = track.misses, "track retired");
            }
        }

        // Unmatched detections spawn tentative tracks
        for di in unmatched_detections {
            let det = &candidates[di];
            let track = Track::new(det.centroid(), frame_index, det.confidence);
            debug!(track_id = track.id, frame_index, "new tentative track");
            self.tracks.push(track);
        }

        // Retired tracks leave the arena; their emitted decisions stand
        self.tracks.retain(|t| !t.is_retired());

        events
    }

    /// All tracks currently in the arena.
    pub fn active_tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn confirmed_count(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_confirmed()).count()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Replace the tracking configuration (hot reload). Existing tracks and
    /// their crossing flags are untouched; new thresholds apply from the
    /// next frame.
    pub fn set_config(&mut self, config: TrackerConfig) {
        self.crossing
            .set_lines(config.entry_line_ratio, config.exit_line_ratio);
        self.config = config;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox_at(cx: f32, cy: f32, confidence: f32) -> BoundingBox {
        BoundingBox::new(cx - 10.0, cy - 10.0, 20.0, 20.0, confidence)
    }

    fn tracker() -> VehicleTracker {
        VehicleTracker::new(TrackerConfig::default())
    }

    #[test]
    fn test_spawn_and_confirm() {
        let mut tracker = tracker();
        tracker.update(&[bbox_at(100.0, 50.0, 0.9)], 640, 480, 1);
        assert_eq!(tracker.active_tracks().len(), 1);
        assert_eq!(tracker.confirmed_count(), 0);

        tracker.update(&[bbox_at(102.0, 52.0, 0.9)], 640, 480, 2);
        tracker.update(&[bbox_at(104.0, 54.0, 0.9)], 640, 480, 3);
        assert_eq!(tracker.confirmed_count(), 1);
    }

    #[test]
    fn test_low_confidence_discarded() {
        let mut tracker = tracker();
        tracker.update(&[bbox_at(100.0, 50.0, 0.3)], 640, 480, 1);
        assert!(tracker.active_tracks().is_empty());
    }

    #[test]
    fn test_malformed_boxes_dropped() {
        let mut tracker = tracker();
        let bad_size = BoundingBox::new(10.0, 10.0, -5.0, 20.0, 0.9);
        let bad_conf = BoundingBox::new(10.0, 10.0, 20.0, 20.0, 1.7);
        tracker.update(&[bad_size, bad_conf], 640, 480, 1);
        assert!(tracker.active_tracks().is_empty());
    }

    #[test]
    fn test_identity_persists_across_frames() {
        let mut tracker = tracker();
        tracker.update(&[bbox_at(100.0, 50.0, 0.9)], 640, 480, 1);
        let id = tracker.active_tracks()[0].id;

        tracker.update(&[bbox_at(108.0, 55.0, 0.9)], 640, 480, 2);
        assert_eq!(tracker.active_tracks().len(), 1);
        assert_eq!(tracker.active_tracks()[0].id, id);
    }

    #[test]
    fn test_distant_detection_spawns_new_track() {
        let mut tracker = tracker();
        tracker.update(&[bbox_at(50.0, 50.0, 0.9)], 640, 480, 1);
        // Far beyond the gate (0.125 * 800 = 100 px)
        tracker.update(&[bbox_at(500.0, 400.0, 0.9)], 640, 480, 2);
        assert_eq!(tracker.active_tracks().len(), 2);
    }
}
