//! Persistent vehicle track and its lifecycle state machine.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::tracker::track_state::TrackState;

/// Global track ID counter for unique ID generation.
///
/// IDs are monotonic for the lifetime of the process and are never reused,
/// even across engine resets.
static TRACK_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Reset the global track ID counter (useful for testing).
pub fn reset_track_id_counter() {
    TRACK_ID_COUNTER.store(0, Ordering::SeqCst);
}

/// Get the next unique track ID.
fn next_track_id() -> u64 {
    TRACK_ID_COUNTER.fetch_add(1, Ordering::SeqCst) + 1
}

/// One observed centroid on a track's trajectory.
#[derive(Debug, Clone, Copy)]
pub struct CentroidSample {
    pub x: f32,
    pub y: f32,
    pub frame_index: u64,
}

/// Retained trajectory length. Crossing detection only ever compares the
/// last two samples; the remainder exists for overlays and diagnostics.
const MAX_CENTROID_HISTORY: usize = 32;

/// A persistent identity for one physical vehicle across frames.
///
/// Owned exclusively by the tracker's arena; the association and crossing
/// stages refer to tracks by `id` and receive mutable access only within a
/// single frame's processing pass.
#[derive(Debug, Clone)]
pub struct Track {
    /// Unique track identifier, monotonically assigned, never reused
    pub id: u64,
    /// Current lifecycle state
    pub state: TrackState,
    /// Ordered centroid trajectory, oldest first, bounded length
    pub centroid_history: VecDeque<CentroidSample>,
    /// Frames since creation
    pub age: u32,
    /// Total successful matches
    pub hits: u32,
    /// Consecutive frames with no matching detection
    pub misses: u32,
    /// Whether this track has already produced its one entry event
    pub crossed_entry: bool,
    /// Whether this track has already produced its one exit event
    pub crossed_exit: bool,
    /// Confidence of the most recent matched detection
    pub last_confidence: f32,
}

impl Track {
    /// Register a new track from an unmatched detection.
    pub fn new(centroid: (f32, f32), frame_index: u64, confidence: f32) -> Self {
        let mut centroid_history = VecDeque::with_capacity(MAX_CENTROID_HISTORY);
        centroid_history.push_back(CentroidSample {
            x: centroid.0,
            y: centroid.1,
            frame_index,
        });
        Self {
            id: next_track_id(),
            state: TrackState::Tentative,
            centroid_history,
            age: 1,
            hits: 1,
            misses: 0,
            crossed_entry: false,
            crossed_exit: false,
            last_confidence: confidence,
        }
    }

    /// The most recent observed centroid. A track always has at least one
    /// sample, the one it was registered with.
    pub fn last_centroid(&self) -> CentroidSample {
        *self
            .centroid_history
            .back()
            .expect("track always holds at least one centroid sample")
    }

    /// The centroid observed before the current one, if any.
    pub fn previous_centroid(&self) -> Option<CentroidSample> {
        let len = self.centroid_history.len();
        if len < 2 {
            return None;
        }
        self.centroid_history.get(len - 2).copied()
    }

    pub fn is_confirmed(&self) -> bool {
        self.state == TrackState::Confirmed
    }

    pub fn is_retired(&self) -> bool {
        self.state == TrackState::Retired
    }

    /// Apply a matched detection for this frame.
    ///
    /// Appends the new centroid, resets the miss counter and recomputes the
    /// state: `hits >= min_confirm_frames` means `Confirmed`. A `Lost` track
    /// that re-matches resumes exactly the state it held before the gap, with
    /// its crossing flags untouched (occlusion recovery).
    ///
    /// Returns whether the track is now eligible for crossing evaluation.
    pub fn record_match(
        &mut self,
        centroid: (f32, f32),
        frame_index: u64,
        confidence: f32,
        min_confirm_frames: u32,
    ) -> bool {
        if self.centroid_history.len() >= MAX_CENTROID_HISTORY {
            self.centroid_history.pop_front();
        }
        self.centroid_history.push_back(CentroidSample {
            x: centroid.0,
            y: centroid.1,
            frame_index,
        });

        self.age += 1;
        self.hits += 1;
        self.misses = 0;
        self.last_confidence = confidence;

        let was = self.state;
        self.state = if self.hits >= min_confirm_frames {
            TrackState::Confirmed
        } else {
            TrackState::Tentative
        };
        if was != self.state {
            debug!(track_id = self.id, from = ?was, to = ?self.state, "track state change");
        }

        self.state.counts()
    }

    /// Apply a missed frame. Increments `misses` and demotes the track to
    /// `Lost`, or to `Retired` once `misses` exceeds the tolerance. No new
    /// centroid is recorded, so a later recovery compares its next position
    /// against the last one seen before the gap.
    pub fn record_miss(&mut self, max_misses: u32) -> TrackState {
        self.age += 1;
        self.misses += 1;
        self.state = if self.misses > max_misses {
            TrackState::Retired
        } else {
            TrackState::Lost
        };
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_after_min_hits() {
        let mut track = Track::new((10.0, 10.0), 1, 0.9);
        assert_eq!(track.state, TrackState::Tentative);

        track.record_match((11.0, 11.0), 2, 0.9, 3);
        assert_eq!(track.state, TrackState::Tentative);

        let eligible = track.record_match((12.0, 12.0), 3, 0.9, 3);
        assert!(eligible);
        assert_eq!(track.state, TrackState::Confirmed);
    }

    #[test]
    fn test_loss_and_recovery_restores_state() {
        let mut track = Track::new((10.0, 10.0), 1, 0.9);
        for f in 2..=4 {
            track.record_match((10.0, 10.0 + f as f32), f, 0.9, 3);
        }
        assert_eq!(track.state, TrackState::Confirmed);
        track.crossed_entry = true;

        assert_eq!(track.record_miss(5), TrackState::Lost);
        assert_eq!(track.record_miss(5), TrackState::Lost);

        track.record_match((10.0, 20.0), 7, 0.9, 3);
        assert_eq!(track.state, TrackState::Confirmed);
        assert_eq!(track.misses, 0);
        // Crossing state survives the gap
        assert!(track.crossed_entry);
    }

    #[test]
    fn test_tentative_recovery_stays_tentative() {
        let mut track = Track::new((10.0, 10.0), 1, 0.9);
        track.record_miss(5);
        track.record_match((11.0, 11.0), 3, 0.9, 3);
        assert_eq!(track.state, TrackState::Tentative);
    }

    #[test]
    fn test_retirement_after_max_misses() {
        let mut track = Track::new((10.0, 10.0), 1, 0.9);
        for _ in 0..3 {
            assert_eq!(track.record_miss(3), TrackState::Lost);
        }
        assert_eq!(track.record_miss(3), TrackState::Retired);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut track = Track::new((0.0, 0.0), 0, 0.9);
        for f in 1..200u64 {
            track.record_match((f as f32, f as f32), f, 0.9, 3);
        }
        assert_eq!(track.centroid_history.len(), MAX_CENTROID_HISTORY);
        // Most recent sample survives eviction
        assert_eq!(track.last_centroid().frame_index, 199);
    }

    #[test]
    fn test_ids_are_monotonic() {
        reset_track_id_counter();
        let a = Track::new((0.0, 0.0), 0, 0.9);
        let b = Track::new((1.0, 1.0), 0, 0.9);
        assert!(b.id > a.id);
    }
}
