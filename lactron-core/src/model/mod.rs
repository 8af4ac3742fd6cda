//! Model Module - trained shelf-life regressors
//!
//! A model is anything that turns a normalized feature vector into a raw
//! shelf-life estimate. Loading is split from inference so the predictor
//! only ever sees an immutable capability.

pub mod loader;
pub mod metadata;
pub mod onnx;
pub mod tree;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{GRADIENT_BOOSTED_CONFIDENCE, NEURAL_NETWORK_CONFIDENCE};
use crate::error::InferenceError;
use crate::normalize::FeatureVector;

pub use loader::{default_strategies, load_first, ModelLoader, OnnxLoader, TreeEnsembleLoader};
pub use metadata::ModelMetadata;
pub use onnx::OnnxModel;
pub use tree::TreeEnsemble;

// ============================================================================
// INFERENCE CAPABILITY TRAIT
// ============================================================================

/// Trait for inference backends (tree ensemble, ONNX, test doubles)
pub trait InferenceCapability: Send + Sync {
    /// Raw shelf-life estimate in days; not clamped
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError>;
}

/// Which family of model produced an estimate.
///
/// Confidence is a static label per family, not a model uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    GradientBoostedTrees,
    NeuralNetwork,
}

impl Provenance {
    pub fn confidence(self) -> f64 {
        match self {
            Provenance::GradientBoostedTrees => GRADIENT_BOOSTED_CONFIDENCE,
            Provenance::NeuralNetwork => NEURAL_NETWORK_CONFIDENCE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Provenance::GradientBoostedTrees => "gradient_boosted_trees",
            Provenance::NeuralNetwork => "neural_network",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// LOADED MODEL
// ============================================================================

/// A capability plus what is known about where it came from
pub struct LoadedModel {
    capability: Box<dyn InferenceCapability>,
    provenance: Provenance,
    metadata: ModelMetadata,
    source: String,
}

impl LoadedModel {
    pub fn new(
        capability: Box<dyn InferenceCapability>,
        provenance: Provenance,
        metadata: ModelMetadata,
        source: impl Into<String>,
    ) -> Self {
        Self {
            capability,
            provenance,
            metadata,
            source: source.into(),
        }
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Artifact path or `<memory>`
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        self.capability.predict(features)
    }
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("provenance", &self.provenance)
            .field("metadata", &self.metadata)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
