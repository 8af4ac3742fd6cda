//! Shelf-Life Predictor
//!
//! Picks its inference path once, at construction:
//! - Model-backed when a [`LoadedModel`] is injected
//! - Formula fallback otherwise
//!
//! Both paths feed the same spoilage policy. `predict` takes `&self`, holds
//! no request state and is safe to call from any number of threads.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::constants::FORMULA_CONFIDENCE;
use crate::error::{ConfigurationError, InferenceError, PredictError};
use crate::model::{LoadedModel, Provenance};
use crate::normalize::Normalizer;
use crate::policy::{self, Status};
use crate::sensor::SensorReading;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Prediction output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub status: Status,
    pub shelf_life: f64, // days
    pub confidence: f64, // static label of the path that produced it
}

/// Active inference path, fixed for the predictor's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "provenance", rename_all = "snake_case")]
pub enum InferenceMode {
    ModelBacked(Provenance),
    FormulaFallback,
}

impl InferenceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InferenceMode::ModelBacked(_) => "model",
            InferenceMode::FormulaFallback => "formula",
        }
    }
}

/// Path that answered one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum InferenceMethod {
    Model { provenance: Provenance },
    Formula,
    /// Model-backed predictor whose model failed on this call
    Degraded { reason: String },
}

/// Result plus how it was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub result: PredictionResult,
    pub method: InferenceMethod,
}

// ============================================================================
// PREDICTOR
// ============================================================================

#[derive(Debug)]
pub struct Predictor {
    config: EngineConfig,
    normalizer: Normalizer,
    model: Option<LoadedModel>,
}

impl Predictor {
    /// Validates the configuration; `model: None` selects the formula path
    pub fn new(config: EngineConfig, model: Option<LoadedModel>) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self {
            normalizer: Normalizer::new(config.normalization),
            config,
            model,
        })
    }

    pub fn formula_only(config: EngineConfig) -> Result<Self, ConfigurationError> {
        Self::new(config, None)
    }

    pub fn mode(&self) -> InferenceMode {
        match &self.model {
            Some(model) => InferenceMode::ModelBacked(model.provenance()),
            None => InferenceMode::FormulaFallback,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn model(&self) -> Option<&LoadedModel> {
        self.model.as_ref()
    }

    /// Three raw ppm readings in, `{status, shelf_life, confidence}` out
    pub fn predict(&self, ethanol: f64, ammonia: f64, h2s: f64) -> Result<PredictionResult, PredictError> {
        self.predict_reading(&SensorReading::new(ethanol, ammonia, h2s))
            .map(|p| p.result)
    }

    pub fn predict_reading(&self, reading: &SensorReading) -> Result<Prediction, PredictError> {
        reading.validate()?;

        let (shelf_life, confidence, method) = match &self.model {
            Some(model) => match self.model_estimate(model, reading) {
                Ok(days) => (
                    days,
                    model.provenance().confidence(),
                    InferenceMethod::Model { provenance: model.provenance() },
                ),
                Err(e) => {
                    let (days, confidence) = self.formula_estimate(reading);
                    (days, confidence, InferenceMethod::Degraded { reason: e.to_string() })
                }
            },
            None => {
                let (days, confidence) = self.formula_estimate(reading);
                (days, confidence, InferenceMethod::Formula)
            }
        };

        Ok(Prediction {
            result: self.apply_policy(reading, shelf_life, confidence),
            method,
        })
    }

    fn model_estimate(&self, model: &LoadedModel, reading: &SensorReading) -> Result<f64, InferenceError> {
        let features = self.normalizer.features(reading);
        let raw = model.predict(&features)?;
        if !raw.is_finite() {
            return Err(InferenceError::NonFinite(raw));
        }

        // Rounding scales by 100, so a huge finite estimate can still overflow
        let days = policy::round_days(raw.max(0.0));
        if !days.is_finite() {
            return Err(InferenceError::OutOfRange(raw));
        }
        Ok(days)
    }

    fn formula_estimate(&self, reading: &SensorReading) -> (f64, f64) {
        let quality = policy::quality_score(reading, &self.config.thresholds, &self.config.weights);
        (policy::quality_to_days(quality), FORMULA_CONFIDENCE)
    }

    /// Any breached threshold forces spoiled and zero days
    fn apply_policy(&self, reading: &SensorReading, shelf_life: f64, confidence: f64) -> PredictionResult {
        if policy::is_spoiled(reading, &self.config.thresholds) {
            PredictionResult {
                status: Status::Spoiled,
                shelf_life: 0.0,
                confidence,
            }
        } else {
            PredictionResult {
                status: Status::Good,
                shelf_life,
                confidence,
            }
        }
    }
}
