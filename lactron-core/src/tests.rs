//! Integration Tests for the Predictor
//!
//! Both inference paths end to end, through the shared spoilage policy.

use std::sync::Arc;

use proptest::prelude::*;

use crate::config::EngineConfig;
use crate::error::{InferenceError, PredictError};
use crate::model::{default_strategies, load_first, InferenceCapability, LoadedModel, ModelMetadata, Provenance};
use crate::normalize::FeatureVector;
use crate::policy::{quality_score, Status};
use crate::predictor::{InferenceMethod, InferenceMode, Predictor};
use crate::sensor::{Sensor, SensorReading};

// ============================================================================
// TEST DOUBLES
// ============================================================================

/// Always returns the same estimate
struct Constant(f64);

impl InferenceCapability for Constant {
    fn predict(&self, _features: &FeatureVector) -> Result<f64, InferenceError> {
        Ok(self.0)
    }
}

/// Sum of the normalized features, to observe what the model was fed
struct FeatureSum;

impl InferenceCapability for FeatureSum {
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        Ok(features.as_slice().iter().sum())
    }
}

struct Broken;

impl InferenceCapability for Broken {
    fn predict(&self, _features: &FeatureVector) -> Result<f64, InferenceError> {
        Err(InferenceError::Runtime("session poisoned".to_string()))
    }
}

fn formula() -> Predictor {
    Predictor::formula_only(EngineConfig::default()).unwrap()
}

fn backed(capability: impl InferenceCapability + 'static, provenance: Provenance) -> Predictor {
    let model = LoadedModel::new(Box::new(capability), provenance, ModelMetadata::default(), "<memory>");
    Predictor::new(EngineConfig::default(), Some(model)).unwrap()
}

fn assert_days(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} days (+/- {}), got {}",
        expected,
        tolerance,
        actual
    );
}

// ============================================================================
// FORMULA FALLBACK
// ============================================================================

#[test]
fn test_formula_zero_reading() {
    let result = formula().predict(0.0, 0.0, 0.0).unwrap();
    assert_eq!(result.status, Status::Good);
    assert_eq!(result.shelf_life, 7.0);
    assert_eq!(result.confidence, 0.78);
}

#[test]
fn test_formula_fresh_milk() {
    let result = formula().predict(10.0, 3.0, 0.5).unwrap();
    assert_eq!(result.status, Status::Good);
    assert_days(result.shelf_life, 6.49, 1e-9);
}

#[test]
fn test_formula_slightly_aged() {
    let result = formula().predict(25.0, 12.0, 3.0).unwrap();
    assert_eq!(result.status, Status::Good);
    assert_days(result.shelf_life, 5.15, 1e-9);
}

#[test]
fn test_formula_warning_zone() {
    let result = formula().predict(45.0, 20.0, 6.0).unwrap();
    assert_eq!(result.status, Status::Good);
    assert_days(result.shelf_life, 3.65, 0.011);
}

#[test]
fn test_formula_spoiled() {
    let result = formula().predict(90.0, 45.0, 18.0).unwrap();
    assert_eq!(result.status, Status::Spoiled);
    assert_eq!(result.shelf_life, 0.0);
    assert_eq!(result.confidence, 0.78);
}

#[test]
fn test_single_breach_overrides_positive_estimate() {
    // Ethanol and ammonia are clean; h2s alone crosses 15 ppm
    let p = formula();
    let reading = SensorReading::new(0.0, 0.0, 15.1);
    let c = p.config();
    assert!(quality_score(&reading, &c.thresholds, &c.weights) > 0.5);

    let result = p.predict_reading(&reading).unwrap().result;
    assert_eq!(result.status, Status::Spoiled);
    assert_eq!(result.shelf_life, 0.0);
}

#[test]
fn test_formula_method_and_mode() {
    let p = formula();
    assert_eq!(p.mode(), InferenceMode::FormulaFallback);
    assert!(p.model().is_none());
    let prediction = p.predict_reading(&SensorReading::new(5.0, 5.0, 1.0)).unwrap();
    assert_eq!(prediction.method, InferenceMethod::Formula);
}

// ============================================================================
// MODEL BACKED
// ============================================================================

#[test]
fn test_model_estimate_is_rounded() {
    let p = backed(Constant(5.4321), Provenance::GradientBoostedTrees);
    let result = p.predict(10.0, 3.0, 0.5).unwrap();
    assert_eq!(result.status, Status::Good);
    assert_eq!(result.shelf_life, 5.43);
    assert_eq!(result.confidence, 0.95);
}

#[test]
fn test_model_negative_estimate_clamped() {
    let p = backed(Constant(-2.5), Provenance::NeuralNetwork);
    let result = p.predict(40.0, 20.0, 5.0).unwrap();
    assert_eq!(result.shelf_life, 0.0);
    assert_eq!(result.status, Status::Good);
    assert_eq!(result.confidence, 0.92);
}

#[test]
fn test_model_estimate_not_capped_at_horizon() {
    let p = backed(Constant(9.0), Provenance::GradientBoostedTrees);
    assert_eq!(p.predict(0.0, 0.0, 0.0).unwrap().shelf_life, 9.0);
}

#[test]
fn test_model_receives_normalized_features() {
    // 75/150 + 40/80 + 15/30
    let p = backed(FeatureSum, Provenance::NeuralNetwork);
    let result = p.predict(75.0, 40.0, 15.0).unwrap();
    assert_eq!(result.shelf_life, 1.5);
}

#[test]
fn test_model_spoilage_override() {
    let p = backed(Constant(6.0), Provenance::GradientBoostedTrees);
    let result = p.predict(90.0, 45.0, 18.0).unwrap();
    assert_eq!(result.status, Status::Spoiled);
    assert_eq!(result.shelf_life, 0.0);
    assert_eq!(result.confidence, 0.95);
}

#[test]
fn test_model_failure_degrades_to_formula() {
    let p = backed(Broken, Provenance::NeuralNetwork);
    assert_eq!(p.mode(), InferenceMode::ModelBacked(Provenance::NeuralNetwork));

    let prediction = p.predict_reading(&SensorReading::default()).unwrap();
    match prediction.method {
        InferenceMethod::Degraded { reason } => assert!(reason.contains("out of range")),
        other => panic!("Expected Degraded, got {:?}", other),
    }
    assert_eq!(prediction.result.shelf_life, 7.0);
    assert_eq!(prediction.result.confidence, 0.78);
}

#[test]
fn test_model_non_finite_degrades_to_formula() {
    let p = backed(Constant(f64::NAN), Provenance::NeuralNetwork);
    let prediction = p.predict_reading(&SensorReading::default()).unwrap();
    match prediction.method {
        InferenceMethod::Degraded { reason } => assert!(reason.contains("non-finite")),
        other => panic!("Expected Degraded, got {:?}", other),
    }
}

#[test]
fn test_onnx_model_end_to_end() {
    let fixture = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/linear_3x1.onnx");
    let onnx = crate::model::OnnxModel::from_file(&fixture).unwrap();
    let p = backed(onnx, Provenance::NeuralNetwork);

    // Normalized (0.1, 0.1, 0.1) through 1x + 2y + 4z + 0.5
    let prediction = p.predict_reading(&SensorReading::new(15.0, 8.0, 3.0)).unwrap();
    assert_eq!(prediction.method, InferenceMethod::Model { provenance: Provenance::NeuralNetwork });
    assert_eq!(prediction.result.status, Status::Good);
    assert_eq!(prediction.result.shelf_life, 1.2);
    assert_eq!(prediction.result.confidence, 0.92);
}

#[test]
fn test_model_overflowing_estimate_degrades_to_formula() {
    let p = backed(Constant(1e307), Provenance::GradientBoostedTrees);
    let prediction = p.predict_reading(&SensorReading::default()).unwrap();

    match prediction.method {
        InferenceMethod::Degraded { reason } => assert!(reason.contains("out of range")),
        other => panic!("Expected Degraded, got {:?}", other),
    }
    assert_eq!(prediction.result.shelf_life, 7.0);
    assert_eq!(prediction.result.confidence, 0.78);
}

#[test]
fn test_formula_confidence_below_model_confidence() {
    let formula_conf = formula().predict(1.0, 1.0, 1.0).unwrap().confidence;
    for provenance in [Provenance::GradientBoostedTrees, Provenance::NeuralNetwork] {
        assert!(formula_conf < provenance.confidence());
    }
}

// ============================================================================
// INPUT / CONSTRUCTION
// ============================================================================

#[test]
fn test_invalid_argument() {
    let err = formula().predict(1.0, 1.0, -3.0).unwrap_err();
    assert_eq!(err, PredictError::InvalidArgument { sensor: Sensor::H2s, value: -3.0 });
    assert!(formula().predict(f64::NAN, 0.0, 0.0).is_err());
}

#[test]
fn test_invalid_config_rejected_at_construction() {
    let mut config = EngineConfig::default();
    config.normalization.h2s.max = -1.0;
    assert!(Predictor::formula_only(config).is_err());
}

#[test]
fn test_no_artifacts_means_formula_mode() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig::default();
    let model = load_first(&default_strategies(dir.path()), &config);
    let p = Predictor::new(config, model).unwrap();

    assert_eq!(p.mode(), InferenceMode::FormulaFallback);
    assert_eq!(p.predict(0.0, 0.0, 0.0).unwrap().confidence, 0.78);
}

#[test]
fn test_parallel_predictions_agree() {
    let p = Arc::new(backed(FeatureSum, Provenance::NeuralNetwork));
    let expected = p.predict(30.0, 16.0, 6.0).unwrap();

    std::thread::scope(|s| {
        for _ in 0..8 {
            let p = Arc::clone(&p);
            s.spawn(move || {
                for _ in 0..100 {
                    assert_eq!(p.predict(30.0, 16.0, 6.0).unwrap(), expected);
                }
            });
        }
    });
}

// ============================================================================
// PROPERTIES
// ============================================================================

fn ppm() -> impl Strategy<Value = f64> {
    0.0f64..300.0
}

proptest! {
    #[test]
    fn prop_idempotent(e in ppm(), a in ppm(), h in ppm(), raw in -5.0f64..15.0) {
        let f = formula();
        prop_assert_eq!(f.predict(e, a, h).unwrap(), f.predict(e, a, h).unwrap());

        let m = backed(Constant(raw), Provenance::GradientBoostedTrees);
        prop_assert_eq!(m.predict(e, a, h).unwrap(), m.predict(e, a, h).unwrap());
    }

    #[test]
    fn prop_breach_forces_spoiled(e in ppm(), a in ppm(), h in ppm(), raw in 0.0f64..15.0) {
        let m = backed(Constant(raw), Provenance::NeuralNetwork);
        let t = m.config().thresholds;
        let breached = e > t.ethanol || a > t.ammonia || h > t.h2s;

        for result in [formula().predict(e, a, h).unwrap(), m.predict(e, a, h).unwrap()] {
            if breached {
                prop_assert_eq!(result.status, Status::Spoiled);
                prop_assert_eq!(result.shelf_life, 0.0);
            } else {
                prop_assert_eq!(result.status, Status::Good);
            }
        }
    }

    #[test]
    fn prop_formula_monotonic(e in ppm(), a in ppm(), h in ppm(), delta in 0.0f64..100.0, which in 0usize..3) {
        let f = formula();
        let c = f.config();
        let base = SensorReading::new(e, a, h);
        let mut raised = base;
        match which {
            0 => raised.ethanol += delta,
            1 => raised.ammonia += delta,
            _ => raised.h2s += delta,
        }

        prop_assert!(
            quality_score(&raised, &c.thresholds, &c.weights)
                <= quality_score(&base, &c.thresholds, &c.weights)
        );
        prop_assert!(
            f.predict_reading(&raised).unwrap().result.shelf_life
                <= f.predict_reading(&base).unwrap().result.shelf_life
        );
    }

    #[test]
    fn prop_shelf_life_ranges(e in ppm(), a in ppm(), h in ppm(), raw in -50.0f64..50.0) {
        let days = formula().predict(e, a, h).unwrap().shelf_life;
        prop_assert!((0.0..=7.0).contains(&days));

        let m = backed(Constant(raw), Provenance::GradientBoostedTrees);
        prop_assert!(m.predict(e, a, h).unwrap().shelf_life >= 0.0);
    }
}
