mod bbox;
mod engine;
mod matching;
mod track;
mod track_state;

pub use bbox::BoundingBox;
pub use engine::{TrackerConfig, VehicleTracker};
pub use track::{CentroidSample, Track, reset_track_id_counter};
pub use track_state::TrackState;
