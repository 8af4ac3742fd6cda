//! Engine error types

use std::path::PathBuf;

use thiserror::Error;

use crate::sensor::Sensor;

/// Invalid or unknown configuration. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("no range configured for sensor '{0}'")]
    UnknownSensor(String),

    #[error("invalid range for {sensor}: max ({max}) must be greater than min ({min})")]
    InvalidRange { sensor: Sensor, min: f64, max: f64 },

    #[error("invalid spoilage threshold for {sensor}: {value}")]
    InvalidThreshold { sensor: Sensor, value: f64 },

    #[error("invalid formula weight for {sensor}: {value}")]
    InvalidWeight { sensor: Sensor, value: f64 },

    #[error("formula weights must sum to 1.0, got {sum}")]
    WeightSum { sum: f64 },

    #[error("invalid zone bands for {sensor}: fresh <= {fresh_max}, warning <= {warning_max}, threshold {threshold}")]
    InvalidZones {
        sensor: Sensor,
        fresh_max: f64,
        warning_max: f64,
        threshold: f64,
    },
}

/// Rejected input reaching the predictor
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("invalid {sensor} reading: {value} (expected a finite, non-negative ppm value)")]
    InvalidArgument { sensor: Sensor, value: f64 },
}

/// A loaded capability failing on a single call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("inference runtime failed: {0}")]
    Runtime(String),

    #[error("model produced a non-finite estimate: {0}")]
    NonFinite(f64),

    #[error("model estimate {0} is out of range")]
    OutOfRange(f64),
}

/// Why a loader strategy produced no capability.
///
/// Never surfaced to callers: the engine degrades to the formula path.
#[derive(Debug, Error)]
pub enum ModelUnavailable {
    #[error("model artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed model artifact: {0}")]
    Format(String),

    #[error("model runtime rejected artifact: {0}")]
    Runtime(String),

    #[error("model artifact incompatible with engine configuration: {0}")]
    Incompatible(String),
}

impl From<serde_json::Error> for ModelUnavailable {
    fn from(err: serde_json::Error) -> Self {
        ModelUnavailable::Format(err.to_string())
    }
}
