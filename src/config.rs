//! Engine configuration surface.
//!
//! Mirrors the deployment config file (JSON), one section per subsystem,
//! with serde defaults so a partial file is valid. The engine consumes but
//! does not own this state: every parameter can be re-applied at runtime
//! through the pipeline's control handle, and an invalid update is rejected
//! at this boundary while the engine keeps its last valid values.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tracker::TrackerConfig;

/// Detection adapter parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum confidence for a detection to reach the tracker, in `[0, 1]`
    pub confidence_threshold: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
        }
    }
}

/// Tracking and crossing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Entry line position as a fraction of frame height, in `[0, 1]`
    pub entry_line_ratio: f32,
    /// Exit line position as a fraction of frame height, in `[0, 1]`
    pub exit_line_ratio: f32,
    /// Maximum match distance as a fraction of the frame diagonal, in `[0, 1]`
    pub gating_ratio: f32,
    /// Successful matches required before a track may generate events
    pub min_confirm_frames: u32,
    /// Consecutive missed frames tolerated before a track is retired
    pub max_misses: u32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            entry_line_ratio: 0.3,
            exit_line_ratio: 0.7,
            gating_ratio: 0.125,
            min_confirm_frames: 3,
            max_misses: 30,
        }
    }
}

/// Parking lot parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkingConfig {
    /// Number of spaces in the lot, must be positive
    pub max_capacity: u32,
    /// Assumed occupancy at startup, as a percentage of capacity
    pub initial_occupancy_percent: f32,
}

impl Default for ParkingConfig {
    fn default() -> Self {
        Self {
            max_capacity: 100,
            initial_occupancy_percent: 0.0,
        }
    }
}

/// Pipeline plumbing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Frame hand-off queue depth; overflow drops the oldest frame
    pub queue_depth: usize,
    /// Snapshot publication cadence when no events occur, in frames
    pub publish_interval_frames: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_depth: 2,
            publish_interval_frames: 30,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub detection: DetectionConfig,
    pub tracking: TrackingConfig,
    pub parking: ParkingConfig,
    pub pipeline: PipelineConfig,
}

fn check_ratio(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::RatioOutOfRange { name, value });
    }
    Ok(())
}

impl EngineConfig {
    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_ratio(
            "detection.confidence_threshold",
            self.detection.confidence_threshold,
        )?;
        check_ratio("tracking.entry_line_ratio", self.tracking.entry_line_ratio)?;
        check_ratio("tracking.exit_line_ratio", self.tracking.exit_line_ratio)?;
        check_ratio("tracking.gating_ratio", self.tracking.gating_ratio)?;
        if self.tracking.min_confirm_frames == 0 {
            return Err(ConfigError::ZeroFrames {
                name: "tracking.min_confirm_frames",
            });
        }
        if self.parking.max_capacity == 0 {
            return Err(ConfigError::NonPositiveCapacity(self.parking.max_capacity));
        }
        if !(0.0..=100.0).contains(&self.parking.initial_occupancy_percent) {
            return Err(ConfigError::PercentOutOfRange {
                name: "parking.initial_occupancy_percent",
                value: self.parking.initial_occupancy_percent,
            });
        }
        if self.pipeline.queue_depth == 0 {
            return Err(ConfigError::ZeroQueueDepth);
        }
        if self.pipeline.publish_interval_frames == 0 {
            return Err(ConfigError::ZeroFrames {
                name: "pipeline.publish_interval_frames",
            });
        }
        Ok(())
    }

    /// Flatten the sections the tracker consumes.
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            confidence_threshold: self.detection.confidence_threshold,
            gating_ratio: self.tracking.gating_ratio,
            min_confirm_frames: self.tracking.min_confirm_frames,
            max_misses: self.tracking.max_misses,
            entry_line_ratio: self.tracking.entry_line_ratio,
            exit_line_ratio: self.tracking.exit_line_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"parking": {"max_capacity": 42}}"#).unwrap();
        assert_eq!(config.parking.max_capacity, 42);
        assert_eq!(config.tracking.entry_line_ratio, 0.3);
        assert_eq!(config.detection.confidence_threshold, 0.5);
    }

    #[test]
    fn test_rejects_out_of_range_ratio() {
        let mut config = EngineConfig::default();
        config.tracking.entry_line_ratio = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RatioOutOfRange { name, .. }) if name == "tracking.entry_line_ratio"
        ));
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let mut config = EngineConfig::default();
        config.parking.max_capacity = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveCapacity(0))
        ));
    }

    #[test]
    fn test_rejects_zero_queue_depth() {
        let mut config = EngineConfig::default();
        config.pipeline.queue_depth = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroQueueDepth)));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("parktrack_config_test.json");
        fs::write(&path, r#"{"tracking": {"exit_line_ratio": 0.8}}"#).unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.tracking.exit_line_ratio, 0.8);
        fs::remove_file(&path).ok();
    }
}
