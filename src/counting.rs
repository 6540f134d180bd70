mod crossing;
mod event;
mod occupancy;

pub use crossing::CrossingDetector;
pub use event::{CrossingEvent, CrossingKind};
pub use occupancy::{OccupancyAggregator, OccupancySnapshot};
