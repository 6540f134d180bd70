//! Virtual line crossing detection.
//!
//! Two horizontal lines are configured as ratios of the frame height. A
//! confirmed track crossing the entry line downward produces one `Entry`
//! event; crossing the exit line upward produces one `Exit` event. Each
//! track can contribute at most one of each for its entire lifetime, which
//! is the sole defense against double-counting a vehicle that jitters
//! across a line boundary. The lines are independent: entry above exit,
//! below it, or coincident are all valid layouts.

use tracing::info;

use crate::counting::event::{CrossingEvent, CrossingKind};
use crate::tracker::Track;

/// Downward crossing: the centroid moved from on-or-above the line to
/// strictly below it (y grows downward in image coordinates).
#[inline]
fn crossed_downward(prev_dy: f32, curr_dy: f32) -> bool {
    prev_dy <= 0.0 && curr_dy > 0.0
}

/// Upward crossing: the centroid moved from strictly below the line to
/// on-or-above it.
#[inline]
fn crossed_upward(prev_dy: f32, curr_dy: f32) -> bool {
    prev_dy > 0.0 && curr_dy <= 0.0
}

/// Evaluates confirmed track trajectories against the entry and exit lines.
#[derive(Debug, Clone)]
pub struct CrossingDetector {
    entry_line_ratio: f32,
    exit_line_ratio: f32,
}

impl CrossingDetector {
    pub fn new(entry_line_ratio: f32, exit_line_ratio: f32) -> Self {
        Self {
            entry_line_ratio,
            exit_line_ratio,
        }
    }

    /// Replace the line positions (hot reload). Ratios are validated at the
    /// configuration boundary before they reach this point.
    pub fn set_lines(&mut self, entry_line_ratio: f32, exit_line_ratio: f32) {
        self.entry_line_ratio = entry_line_ratio;
        self.exit_line_ratio = exit_line_ratio;
    }

    #[inline]
    pub fn entry_line_y(&self, frame_height: f32) -> f32 {
        self.entry_line_ratio * frame_height
    }

    #[inline]
    pub fn exit_line_y(&self, frame_height: f32) -> f32 {
        self.exit_line_ratio * frame_height
    }

    /// Evaluate one track's latest movement against both lines.
    ///
    /// Compares the previous and current centroid only, so a track whose
    /// first sample is already past a line never counts retroactively: its
    /// position before the track existed is unknown. Emits at most one event
    /// per call and flips the corresponding `crossed_*` flag, which is never
    /// cleared for the lifetime of the track.
    pub fn evaluate(
        &self,
        track: &mut Track,
        frame_height: f32,
        frame_index: u64,
    ) -> Option<CrossingEvent> {
        let prev = track.previous_centroid()?;
        let curr = track.last_centroid();

        if !track.crossed_entry {
            let line_y = self.entry_line_y(frame_height);
            if crossed_downward(prev.y - line_y, curr.y - line_y) {
                track.crossed_entry = true;
                info!(track_id = track.id, frame_index, "entry line crossed");
                return Some(CrossingEvent::new(track.id, CrossingKind::Entry, frame_index));
            }
        }

        if !track.crossed_exit {
            let line_y = self.exit_line_y(frame_height);
            if crossed_upward(prev.y - line_y, curr.y - line_y) {
                track.crossed_exit = true;
                info!(track_id = track.id, frame_index, "exit line crossed");
                return Some(CrossingEvent::new(track.id, CrossingKind::Exit, frame_index));
            }
        }

        None
    }
}
