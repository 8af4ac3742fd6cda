//! Engine Configuration
//!
//! Process-wide constants bundled into one value. Built once at startup,
//! validated, then shared read-only.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigurationError;
use crate::sensor::{SensorTable, SENSOR_LAYOUT};

/// Linear rescaling bounds for one sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationRange {
    pub min: f64,
    pub max: f64,
}

impl NormalizationRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Upper bounds (inclusive) of the fresh and warning zones
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneBand {
    pub fresh_max: f64,
    pub warning_max: f64,
}

pub type NormalizationTable = SensorTable<NormalizationRange>;
pub type SpoilageThresholds = SensorTable<f64>;
pub type FormulaWeights = SensorTable<f64>;
pub type ZoneBands = SensorTable<ZoneBand>;

/// Everything the predictor reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub normalization: NormalizationTable,
    pub thresholds: SpoilageThresholds,
    pub weights: FormulaWeights,
    pub zones: ZoneBands,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            normalization: SensorTable::new(
                NormalizationRange::new(ETHANOL_RANGE.0, ETHANOL_RANGE.1),
                NormalizationRange::new(AMMONIA_RANGE.0, AMMONIA_RANGE.1),
                NormalizationRange::new(H2S_RANGE.0, H2S_RANGE.1),
            ),
            thresholds: SensorTable::new(ETHANOL_THRESHOLD, AMMONIA_THRESHOLD, H2S_THRESHOLD),
            weights: SensorTable::new(ETHANOL_WEIGHT, AMMONIA_WEIGHT, H2S_WEIGHT),
            zones: SensorTable::new(
                ZoneBand { fresh_max: ETHANOL_FRESH_MAX, warning_max: ETHANOL_WARNING_MAX },
                ZoneBand { fresh_max: AMMONIA_FRESH_MAX, warning_max: AMMONIA_WARNING_MAX },
                ZoneBand { fresh_max: H2S_FRESH_MAX, warning_max: H2S_WARNING_MAX },
            ),
        }
    }
}

impl EngineConfig {
    /// Check every invariant. Called by the predictor constructor.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for sensor in SENSOR_LAYOUT {
            let range = self.normalization.get(sensor);
            if !range.min.is_finite() || !range.max.is_finite() || range.max <= range.min {
                return Err(ConfigurationError::InvalidRange {
                    sensor,
                    min: range.min,
                    max: range.max,
                });
            }

            let threshold = *self.thresholds.get(sensor);
            if !threshold.is_finite() || threshold <= 0.0 {
                return Err(ConfigurationError::InvalidThreshold { sensor, value: threshold });
            }

            let weight = *self.weights.get(sensor);
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigurationError::InvalidWeight { sensor, value: weight });
            }

            let band = self.zones.get(sensor);
            let ordered = 0.0 <= band.fresh_max
                && band.fresh_max <= band.warning_max
                && band.warning_max <= threshold;
            if !ordered {
                return Err(ConfigurationError::InvalidZones {
                    sensor,
                    fresh_max: band.fresh_max,
                    warning_max: band.warning_max,
                    threshold,
                });
            }
        }

        let sum: f64 = self.weights.iter().map(|(_, w)| *w).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigurationError::WeightSum { sum });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::Sensor;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_range() {
        let mut config = EngineConfig::default();
        config.normalization.ammonia = NormalizationRange::new(10.0, 10.0);

        match config.validate() {
            Err(ConfigurationError::InvalidRange { sensor, .. }) => assert_eq!(sensor, Sensor::Ammonia),
            other => panic!("Expected InvalidRange, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_zero_threshold() {
        let mut config = EngineConfig::default();
        config.thresholds.h2s = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidThreshold { sensor: Sensor::H2s, .. })
        ));
    }

    #[test]
    fn test_rejects_weights_not_summing_to_one() {
        let mut config = EngineConfig::default();
        config.weights = SensorTable::new(0.4, 0.35, 0.4);
        assert!(matches!(config.validate(), Err(ConfigurationError::WeightSum { .. })));
    }

    #[test]
    fn test_rejects_zone_above_threshold() {
        let mut config = EngineConfig::default();
        config.zones.ethanol.warning_max = 120.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidZones { sensor: Sensor::Ethanol, .. })
        ));
    }
}
