//! Sensor Layout - Centralized Sensor Definition
//!
//! **This file controls the feature order fed to every model.**
//!
//! Models are trained against `SENSOR_LAYOUT` in exactly this order.
//! Reordering it invalidates every shipped artifact.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, PredictError};

// ============================================================================
// SENSORS
// ============================================================================

/// Volatile compound measured by the sensor array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensor {
    Ethanol,
    Ammonia,
    H2s,
}

/// Number of sensors (and model features)
pub const SENSOR_COUNT: usize = 3;

/// Sensors in the exact order they appear in a feature vector
pub const SENSOR_LAYOUT: [Sensor; SENSOR_COUNT] = [Sensor::Ethanol, Sensor::Ammonia, Sensor::H2s];

impl Sensor {
    /// Wire / configuration name
    pub fn name(self) -> &'static str {
        match self {
            Sensor::Ethanol => "ethanol",
            Sensor::Ammonia => "ammonia",
            Sensor::H2s => "h2s",
        }
    }

    /// Position in the feature vector
    pub fn index(self) -> usize {
        match self {
            Sensor::Ethanol => 0,
            Sensor::Ammonia => 1,
            Sensor::H2s => 2,
        }
    }

    /// Look a sensor up by name; unknown names are a configuration error
    pub fn from_name(name: &str) -> Result<Self, ConfigurationError> {
        SENSOR_LAYOUT
            .iter()
            .copied()
            .find(|s| s.name() == name)
            .ok_or_else(|| ConfigurationError::UnknownSensor(name.to_string()))
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sensor {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sensor::from_name(s)
    }
}

/// Feature names in layout order
pub fn layout_names() -> Vec<&'static str> {
    SENSOR_LAYOUT.iter().map(|s| s.name()).collect()
}

// ============================================================================
// PER-SENSOR TABLE
// ============================================================================

/// One value per sensor. Used for ranges, thresholds, weights and zones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorTable<T> {
    pub ethanol: T,
    pub ammonia: T,
    pub h2s: T,
}

impl<T> SensorTable<T> {
    pub fn new(ethanol: T, ammonia: T, h2s: T) -> Self {
        Self { ethanol, ammonia, h2s }
    }

    pub fn get(&self, sensor: Sensor) -> &T {
        match sensor {
            Sensor::Ethanol => &self.ethanol,
            Sensor::Ammonia => &self.ammonia,
            Sensor::H2s => &self.h2s,
        }
    }

    /// Entries in layout order
    pub fn iter(&self) -> impl Iterator<Item = (Sensor, &T)> {
        SENSOR_LAYOUT.iter().map(move |&s| (s, self.get(s)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(Sensor, &T) -> U) -> SensorTable<U> {
        SensorTable {
            ethanol: f(Sensor::Ethanol, &self.ethanol),
            ammonia: f(Sensor::Ammonia, &self.ammonia),
            h2s: f(Sensor::H2s, &self.h2s),
        }
    }
}

// ============================================================================
// READING
// ============================================================================

/// Raw concentrations in ppm
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorReading {
    pub ethanol: f64,
    pub ammonia: f64,
    pub h2s: f64,
}

impl SensorReading {
    pub fn new(ethanol: f64, ammonia: f64, h2s: f64) -> Self {
        Self { ethanol, ammonia, h2s }
    }

    pub fn get(&self, sensor: Sensor) -> f64 {
        match sensor {
            Sensor::Ethanol => self.ethanol,
            Sensor::Ammonia => self.ammonia,
            Sensor::H2s => self.h2s,
        }
    }

    /// Values in layout order
    pub fn values(&self) -> [f64; SENSOR_COUNT] {
        [self.ethanol, self.ammonia, self.h2s]
    }

    /// Reject negative or non-finite concentrations. No upper bound.
    pub fn validate(&self) -> Result<(), PredictError> {
        for sensor in SENSOR_LAYOUT {
            let value = self.get(sensor);
            if !value.is_finite() || value < 0.0 {
                return Err(PredictError::InvalidArgument { sensor, value });
            }
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_order() {
        assert_eq!(SENSOR_LAYOUT.len(), SENSOR_COUNT);
        for (i, sensor) in SENSOR_LAYOUT.iter().enumerate() {
            assert_eq!(sensor.index(), i);
        }
        assert_eq!(layout_names(), vec!["ethanol", "ammonia", "h2s"]);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Sensor::from_name("h2s"), Ok(Sensor::H2s));
        assert_eq!("ammonia".parse::<Sensor>(), Ok(Sensor::Ammonia));
        assert_eq!(
            Sensor::from_name("methane"),
            Err(ConfigurationError::UnknownSensor("methane".to_string()))
        );
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Sensor::H2s).unwrap(), "\"h2s\"");
        let sensor: Sensor = serde_json::from_str("\"ethanol\"").unwrap();
        assert_eq!(sensor, Sensor::Ethanol);
    }

    #[test]
    fn test_reading_validation() {
        assert!(SensorReading::new(0.0, 0.0, 0.0).validate().is_ok());
        // Far beyond any training range is still accepted
        assert!(SensorReading::new(10_000.0, 500.0, 90.0).validate().is_ok());

        let err = SensorReading::new(1.0, -0.5, 1.0).validate().unwrap_err();
        assert_eq!(err, PredictError::InvalidArgument { sensor: Sensor::Ammonia, value: -0.5 });

        assert!(SensorReading::new(f64::NAN, 0.0, 0.0).validate().is_err());
        assert!(SensorReading::new(0.0, 0.0, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_table_map() {
        let table = SensorTable::new(1.0, 2.0, 3.0);
        let doubled = table.map(|_, v| v * 2.0);
        assert_eq!(*doubled.get(Sensor::H2s), 6.0);
        let sensors: Vec<Sensor> = table.iter().map(|(s, _)| s).collect();
        assert_eq!(sensors, SENSOR_LAYOUT.to_vec());
    }
}
