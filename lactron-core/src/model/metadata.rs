//! Model metadata and the startup consistency check
//!
//! Artifacts may declare the feature order, normalization ranges and
//! thresholds they were trained against. Anything declared must match the
//! running configuration; anything omitted is accepted as-is.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, NormalizationRange};
use crate::constants::METADATA_TOLERANCE;
use crate::error::ModelUnavailable;
use crate::sensor::{layout_names, Sensor};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub trained_on_records: Option<u64>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(default)]
    pub normalization: Option<BTreeMap<String, NormalizationRange>>,
    #[serde(default)]
    pub thresholds: Option<BTreeMap<String, f64>>,
}

impl ModelMetadata {
    /// Read a JSON sidecar
    pub fn from_file(path: &Path) -> Result<Self, ModelUnavailable> {
        let content = std::fs::read_to_string(path)?;
        let metadata = serde_json::from_str(&content)?;
        Ok(metadata)
    }

    /// Reject artifacts trained against a different feature space
    pub fn check_compatible(&self, config: &EngineConfig) -> Result<(), ModelUnavailable> {
        if let Some(names) = &self.feature_names {
            let expected = layout_names();
            if names.iter().map(String::as_str).ne(expected.iter().copied()) {
                return Err(ModelUnavailable::Incompatible(format!(
                    "feature order {:?}, engine expects {:?}",
                    names, expected
                )));
            }
        }

        if let Some(ranges) = &self.normalization {
            for (name, declared) in ranges {
                let sensor = known_sensor(name)?;
                let configured = config.normalization.get(sensor);
                if !close(declared.min, configured.min) || !close(declared.max, configured.max) {
                    return Err(ModelUnavailable::Incompatible(format!(
                        "{} trained on range {}..{}, engine normalizes with {}..{}",
                        sensor, declared.min, declared.max, configured.min, configured.max
                    )));
                }
            }
        }

        if let Some(thresholds) = &self.thresholds {
            for (name, declared) in thresholds {
                let sensor = known_sensor(name)?;
                let configured = *config.thresholds.get(sensor);
                if !close(*declared, configured) {
                    return Err(ModelUnavailable::Incompatible(format!(
                        "{} trained with threshold {}, engine uses {}",
                        sensor, declared, configured
                    )));
                }
            }
        }

        Ok(())
    }
}

fn known_sensor(name: &str) -> Result<Sensor, ModelUnavailable> {
    Sensor::from_name(name).map_err(|e| ModelUnavailable::Incompatible(e.to_string()))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= METADATA_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared_ranges(ethanol_max: f64) -> BTreeMap<String, NormalizationRange> {
        let mut ranges = BTreeMap::new();
        ranges.insert("ethanol".to_string(), NormalizationRange::new(0.0, ethanol_max));
        ranges.insert("ammonia".to_string(), NormalizationRange::new(0.0, 80.0));
        ranges.insert("h2s".to_string(), NormalizationRange::new(0.0, 30.0));
        ranges
    }

    #[test]
    fn test_empty_metadata_is_accepted() {
        assert!(ModelMetadata::default().check_compatible(&EngineConfig::default()).is_ok());
    }

    #[test]
    fn test_matching_declaration_is_accepted() {
        let meta = ModelMetadata {
            feature_names: Some(vec!["ethanol".into(), "ammonia".into(), "h2s".into()]),
            normalization: Some(declared_ranges(150.0)),
            ..Default::default()
        };
        assert!(meta.check_compatible(&EngineConfig::default()).is_ok());
    }

    #[test]
    fn test_range_mismatch_is_rejected() {
        // Older deployments normalized ethanol over 0..500
        let meta = ModelMetadata {
            normalization: Some(declared_ranges(500.0)),
            ..Default::default()
        };
        let err = meta.check_compatible(&EngineConfig::default()).unwrap_err();
        assert!(matches!(err, ModelUnavailable::Incompatible(_)));
        assert!(err.to_string().contains("ethanol"));
    }

    #[test]
    fn test_threshold_mismatch_is_rejected() {
        let mut thresholds = BTreeMap::new();
        thresholds.insert("h2s".to_string(), 10.0);
        let meta = ModelMetadata {
            thresholds: Some(thresholds),
            ..Default::default()
        };
        assert!(meta.check_compatible(&EngineConfig::default()).is_err());
    }

    #[test]
    fn test_feature_order_mismatch_is_rejected() {
        let meta = ModelMetadata {
            feature_names: Some(vec!["h2s".into(), "ammonia".into(), "ethanol".into()]),
            ..Default::default()
        };
        assert!(meta.check_compatible(&EngineConfig::default()).is_err());
    }

    #[test]
    fn test_unknown_sensor_is_rejected() {
        let mut thresholds = BTreeMap::new();
        thresholds.insert("methane".to_string(), 10.0);
        let meta = ModelMetadata {
            thresholds: Some(thresholds),
            ..Default::default()
        };
        assert!(meta.check_compatible(&EngineConfig::default()).is_err());
    }

    #[test]
    fn test_parse_sidecar() {
        let json = r#"{
            "model_version": "2025.1",
            "trained_on_records": 8000,
            "normalization": {"ethanol": {"min": 0, "max": 150}}
        }"#;
        let meta: ModelMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.model_version.as_deref(), Some("2025.1"));
        assert_eq!(meta.trained_on_records, Some(8000));
        assert!(meta.feature_names.is_none());
        assert!(meta.check_compatible(&EngineConfig::default()).is_ok());
    }
}
