//! Spoilage Policy
//!
//! Threshold gate, formula quality score and sensor zones.
//! Shared by both inference paths.

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, FormulaWeights, SpoilageThresholds, ZoneBands};
use crate::constants::{SHELF_LIFE_DECIMALS, SHELF_LIFE_HORIZON_DAYS};
use crate::sensor::{Sensor, SensorReading, SensorTable, SENSOR_LAYOUT};

/// User-facing verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Good,
    Spoiled,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Good => "good",
            Status::Spoiled => "spoiled",
        }
    }
}

/// Where a single reading sits relative to its bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorZone {
    Fresh,
    Warning,
    Elevated,
    Spoiled,
}

// ============================================================================
// THRESHOLD GATE
// ============================================================================

/// Hard OR-gate: any sensor strictly above its threshold spoils the sample
pub fn is_spoiled(reading: &SensorReading, thresholds: &SpoilageThresholds) -> bool {
    SENSOR_LAYOUT
        .iter()
        .any(|&s| reading.get(s) > *thresholds.get(s))
}

/// Sensors currently over their threshold, in layout order
pub fn breached_sensors(reading: &SensorReading, thresholds: &SpoilageThresholds) -> Vec<Sensor> {
    SENSOR_LAYOUT
        .iter()
        .copied()
        .filter(|&s| reading.get(s) > *thresholds.get(s))
        .collect()
}

// ============================================================================
// FORMULA
// ============================================================================

/// 1.0 at zero, linear decay to 0.0 at the threshold, clamped below
pub fn sensor_score(value: f64, threshold: f64) -> f64 {
    (1.0 - value / threshold).max(0.0)
}

/// Weighted composite in [0, 1]
pub fn quality_score(
    reading: &SensorReading,
    thresholds: &SpoilageThresholds,
    weights: &FormulaWeights,
) -> f64 {
    SENSOR_LAYOUT
        .iter()
        .map(|&s| weights.get(s) * sensor_score(reading.get(s), *thresholds.get(s)))
        .sum()
}

/// Map a [0, 1] quality score onto the shelf-life horizon
pub fn quality_to_days(quality: f64) -> f64 {
    round_days(quality * SHELF_LIFE_HORIZON_DAYS).max(0.0)
}

/// Presentation rounding for shelf life
pub fn round_days(days: f64) -> f64 {
    let factor = 10f64.powi(SHELF_LIFE_DECIMALS);
    (days * factor).round() / factor
}

// ============================================================================
// ZONES
// ============================================================================

pub fn classify(value: f64, band_fresh_max: f64, band_warning_max: f64, threshold: f64) -> SensorZone {
    if value > threshold {
        SensorZone::Spoiled
    } else if value > band_warning_max {
        SensorZone::Elevated
    } else if value > band_fresh_max {
        SensorZone::Warning
    } else {
        SensorZone::Fresh
    }
}

pub fn zones(reading: &SensorReading, bands: &ZoneBands, thresholds: &SpoilageThresholds) -> SensorTable<SensorZone> {
    bands.map(|sensor, band| {
        classify(reading.get(sensor), band.fresh_max, band.warning_max, *thresholds.get(sensor))
    })
}

/// Zones of a reading under a full engine configuration
pub fn zones_for(reading: &SensorReading, config: &EngineConfig) -> SensorTable<SensorZone> {
    zones(reading, &config.zones, &config.thresholds)
}
