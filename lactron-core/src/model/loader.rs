//! Model Loader - ordered artifact strategies
//!
//! Each strategy tries one artifact format. The first one that loads and
//! passes the consistency check wins; if none does, the engine runs on the
//! formula and nobody crashes.

use std::path::{Path, PathBuf};

use super::metadata::ModelMetadata;
use super::onnx::OnnxModel;
use super::tree::TreeEnsemble;
use super::{LoadedModel, Provenance};
use crate::config::EngineConfig;
use crate::constants::{METADATA_SUFFIX, ONNX_MODEL_FILE, TREE_MODEL_FILE};
use crate::error::ModelUnavailable;

/// One way of materializing a capability
pub trait ModelLoader: Send + Sync {
    /// Short label for logs
    fn name(&self) -> &'static str;

    fn load(&self, config: &EngineConfig) -> Result<LoadedModel, ModelUnavailable>;
}

// ============================================================================
// TREE ENSEMBLE (JSON)
// ============================================================================

pub struct TreeEnsembleLoader {
    path: PathBuf,
}

impl TreeEnsembleLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ModelLoader for TreeEnsembleLoader {
    fn name(&self) -> &'static str {
        "tree_ensemble"
    }

    fn load(&self, config: &EngineConfig) -> Result<LoadedModel, ModelUnavailable> {
        let ensemble = TreeEnsemble::from_file(&self.path)?;
        ensemble.metadata.check_compatible(config)?;

        log::info!(
            "Tree ensemble loaded: {} trees from {}",
            ensemble.tree_count(),
            self.path.display()
        );

        let metadata = ensemble.metadata.clone();
        Ok(LoadedModel::new(
            Box::new(ensemble),
            Provenance::GradientBoostedTrees,
            metadata,
            self.path.display().to_string(),
        ))
    }
}

// ============================================================================
// ONNX
// ============================================================================

pub struct OnnxLoader {
    path: PathBuf,
}

impl OnnxLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `model.onnx` -> `model.onnx.json`
    fn metadata_path(&self) -> PathBuf {
        let mut path = self.path.clone().into_os_string();
        path.push(METADATA_SUFFIX);
        PathBuf::from(path)
    }

    fn load_metadata(&self) -> Result<ModelMetadata, ModelUnavailable> {
        let path = self.metadata_path();
        if path.exists() {
            ModelMetadata::from_file(&path)
        } else {
            Ok(ModelMetadata::default())
        }
    }
}

impl ModelLoader for OnnxLoader {
    fn name(&self) -> &'static str {
        "onnx"
    }

    fn load(&self, config: &EngineConfig) -> Result<LoadedModel, ModelUnavailable> {
        if !self.path.exists() {
            return Err(ModelUnavailable::NotFound(self.path.clone()));
        }

        // Check the sidecar before paying for a runtime session
        let metadata = self.load_metadata()?;
        metadata.check_compatible(config)?;

        let model = OnnxModel::from_file(&self.path)?;
        log::info!("ONNX model loaded successfully");

        Ok(LoadedModel::new(
            Box::new(model),
            Provenance::NeuralNetwork,
            metadata,
            self.path.display().to_string(),
        ))
    }
}

// ============================================================================
// STRATEGY LIST
// ============================================================================

/// Tree ensemble first, then the neural network
pub fn default_strategies(model_dir: &Path) -> Vec<Box<dyn ModelLoader>> {
    vec![
        Box::new(TreeEnsembleLoader::new(model_dir.join(TREE_MODEL_FILE))),
        Box::new(OnnxLoader::new(model_dir.join(ONNX_MODEL_FILE))),
    ]
}

/// First successful strategy wins. Failures are informational only.
pub fn load_first(strategies: &[Box<dyn ModelLoader>], config: &EngineConfig) -> Option<LoadedModel> {
    for strategy in strategies {
        match strategy.load(config) {
            Ok(model) => {
                log::info!(
                    "Model-backed inference enabled via {} ({})",
                    strategy.name(),
                    model.provenance()
                );
                return Some(model);
            }
            Err(e) => {
                log::info!("Model strategy {} unavailable: {}", strategy.name(), e);
            }
        }
    }

    log::info!("No model available. Using formula fallback.");
    None
}
