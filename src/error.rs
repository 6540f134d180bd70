//! Error types for the tracking and counting engine.
//!
//! The engine itself never fails: input anomalies are dropped with a logged
//! warning and invariant violations are clamped and reported. The only
//! fallible surface is the configuration boundary.

use thiserror::Error;

/// Errors raised when validating or loading engine configuration.
///
/// A rejected value never disturbs the running engine; callers keep the
/// last valid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `max_capacity` must be a positive number of parking spaces.
    #[error("max_capacity must be positive, got {0}")]
    NonPositiveCapacity(u32),

    /// A ratio-valued parameter fell outside `[0, 1]`.
    #[error("{name} must be within [0, 1], got {value}")]
    RatioOutOfRange { name: &'static str, value: f32 },

    /// A percentage-valued parameter fell outside `[0, 100]`.
    #[error("{name} must be within [0, 100], got {value}")]
    PercentOutOfRange { name: &'static str, value: f32 },

    /// A frame-count parameter must be at least one.
    #[error("{name} must be at least 1")]
    ZeroFrames { name: &'static str },

    /// The frame queue needs room for at least one frame.
    #[error("queue_depth must be at least 1")]
    ZeroQueueDepth,

    /// Reading the configuration file failed.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}
