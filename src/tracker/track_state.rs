/// Track state enumeration for the track lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Newly created track, not yet trusted for counting
    #[default]
    Tentative,
    /// Seen often enough to count; eligible for crossing evaluation
    Confirmed,
    /// Missed at least one frame but still within tolerance
    Lost,
    /// Terminal; removed from the active set, id never reused
    Retired,
}

impl TrackState {
    /// Only confirmed tracks may generate crossing events.
    #[inline]
    pub fn counts(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}
