//! Normalizer - raw ppm to model features
//!
//! `(value - min) / (max - min)` per sensor, with no clamping: readings
//! outside the training range extrapolate past [0, 1] and the model or
//! formula sees the full signal.

use serde::{Deserialize, Serialize};

use crate::config::NormalizationTable;
use crate::error::ConfigurationError;
use crate::sensor::{Sensor, SensorReading, SENSOR_COUNT, SENSOR_LAYOUT};

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Normalized features in `SENSOR_LAYOUT` order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; SENSOR_COUNT],
}

impl FeatureVector {
    pub fn from_values(values: [f64; SENSOR_COUNT]) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, sensor: Sensor) -> f64 {
        self.values[sensor.index()]
    }

    /// Single precision copy for runtimes that take f32 tensors
    pub fn to_f32(&self) -> [f32; SENSOR_COUNT] {
        self.values.map(|v| v as f32)
    }
}

// ============================================================================
// NORMALIZER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    ranges: NormalizationTable,
}

impl Normalizer {
    pub fn new(ranges: NormalizationTable) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &NormalizationTable {
        &self.ranges
    }

    pub fn normalize(&self, value: f64, sensor: Sensor) -> f64 {
        let range = self.ranges.get(sensor);
        (value - range.min) / range.span()
    }

    /// Name-keyed lookup for callers holding configuration strings
    pub fn normalize_by_name(&self, value: f64, name: &str) -> Result<f64, ConfigurationError> {
        let sensor = Sensor::from_name(name)?;
        Ok(self.normalize(value, sensor))
    }

    pub fn features(&self, reading: &SensorReading) -> FeatureVector {
        let mut values = [0.0; SENSOR_COUNT];
        for sensor in SENSOR_LAYOUT {
            values[sensor.index()] = self.normalize(reading.get(sensor), sensor);
        }
        FeatureVector::from_values(values)
    }
}
