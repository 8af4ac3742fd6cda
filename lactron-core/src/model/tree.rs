//! Gradient-boosted tree ensemble
//!
//! Evaluates a regressor exported to JSON:
//!
//! ```json
//! {
//!   "format": "gradient_boosted_trees",
//!   "init_value": 3.4,
//!   "learning_rate": 0.08,
//!   "trees": [{ "nodes": [
//!     { "feature": 2, "threshold": 0.27, "left": 1, "right": 2 },
//!     { "value": 0.61 },
//!     { "value": -1.9 }
//!   ]}],
//!   "metadata": { "model_version": "1" }
//! }
//! ```
//!
//! Prediction is `init_value + learning_rate * sum(leaf)`. A split sends the
//! sample left when `x <= threshold`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::metadata::ModelMetadata;
use super::InferenceCapability;
use crate::error::{InferenceError, ModelUnavailable};
use crate::normalize::FeatureVector;
use crate::sensor::SENSOR_COUNT;

/// Value of the `format` field this evaluator understands
pub const TREE_FORMAT: &str = "gradient_boosted_trees";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Children must point strictly forward, so every walk terminates
    fn validate(&self, index: usize) -> Result<(), ModelUnavailable> {
        if self.nodes.is_empty() {
            return Err(ModelUnavailable::Format(format!("tree {} has no nodes", index)));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split { feature, threshold, left, right } => {
                    if feature >= SENSOR_COUNT {
                        return Err(ModelUnavailable::Format(format!(
                            "tree {} node {} splits on feature {} (only {} features)",
                            index, i, feature, SENSOR_COUNT
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ModelUnavailable::Format(format!(
                            "tree {} node {} has a non-finite threshold",
                            index, i
                        )));
                    }
                    for child in [left, right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(ModelUnavailable::Format(format!(
                                "tree {} node {} has invalid child {}",
                                index, i, child
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(ModelUnavailable::Format(format!(
                            "tree {} leaf {} is not finite",
                            index, i
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    fn evaluate(&self, features: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                TreeNode::Split { feature, threshold, left, right } => {
                    index = if features[feature] <= threshold { left } else { right };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}

/// Additive ensemble of regression trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub format: String,
    pub init_value: f64,
    pub learning_rate: f64,
    pub trees: Vec<Tree>,
    #[serde(default)]
    pub metadata: ModelMetadata,
}

impl TreeEnsemble {
    /// Parse and validate an exported ensemble
    pub fn from_json(json: &str) -> Result<Self, ModelUnavailable> {
        let ensemble: TreeEnsemble = serde_json::from_str(json)?;
        ensemble.validate()?;
        Ok(ensemble)
    }

    pub fn from_file(path: &Path) -> Result<Self, ModelUnavailable> {
        if !path.exists() {
            return Err(ModelUnavailable::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ModelUnavailable> {
        if self.format != TREE_FORMAT {
            return Err(ModelUnavailable::Format(format!(
                "unsupported format '{}', expected '{}'",
                self.format, TREE_FORMAT
            )));
        }
        if !self.init_value.is_finite() || !self.learning_rate.is_finite() {
            return Err(ModelUnavailable::Format(
                "init_value and learning_rate must be finite".to_string(),
            ));
        }
        if self.trees.is_empty() {
            return Err(ModelUnavailable::Format("ensemble has no trees".to_string()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i)?;
        }
        Ok(())
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Infallible once validated
    pub fn evaluate(&self, features: &FeatureVector) -> f64 {
        let values = features.as_slice();
        let boost: f64 = self.trees.iter().map(|t| t.evaluate(values)).sum();
        self.init_value + self.learning_rate * boost
    }
}

impl InferenceCapability for TreeEnsemble {
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        Ok(self.evaluate(features))
    }
}
