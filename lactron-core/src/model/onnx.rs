//! ONNX Runtime Integration
//!
//! Runs a neural-network regressor exported to ONNX. Input is a `[1, 3]`
//! f32 tensor of normalized features; the first element of the first output
//! is the raw shelf-life estimate.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::tensor::TensorElementType;
use ort::value::Value;
use parking_lot::Mutex;

use super::InferenceCapability;
use crate::error::{InferenceError, ModelUnavailable};
use crate::normalize::FeatureVector;
use crate::sensor::SENSOR_COUNT;

/// Loaded ONNX session.
///
/// `Session::run` needs exclusive access, so the session sits behind a
/// mutex private to this capability.
pub struct OnnxModel {
    session: Mutex<Session>,
    output_name: String,
}

impl OnnxModel {
    /// Load ONNX model from file
    pub fn from_file(model_path: &Path) -> Result<Self, ModelUnavailable> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(ModelUnavailable::NotFound(model_path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(|e| ModelUnavailable::Runtime(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelUnavailable::Runtime(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| ModelUnavailable::Runtime(format!("Failed to load model: {}", e)))?;

        Self::from_session(session)
    }

    fn from_session(session: Session) -> Result<Self, ModelUnavailable> {
        check_signature(&session)?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| ModelUnavailable::Format("model defines no outputs".to_string()))?;

        Ok(Self {
            session: Mutex::new(session),
            output_name,
        })
    }
}

/// One f32 input shaped `[1, 3]` (dynamic dimensions allowed), f32 first output
fn check_signature(session: &Session) -> Result<(), ModelUnavailable> {
    let input = match session.inputs.as_slice() {
        [input] => input,
        inputs => {
            return Err(ModelUnavailable::Incompatible(format!(
                "expected exactly one input, found {}",
                inputs.len()
            )))
        }
    };

    if input.input_type.tensor_type() != Some(TensorElementType::Float32) {
        return Err(ModelUnavailable::Incompatible(format!(
            "input '{}' is not an f32 tensor: {:?}",
            input.name, input.input_type
        )));
    }

    let dims_ok = match input.input_type.tensor_shape().map(|shape| &**shape) {
        Some(&[batch, width]) => (batch == 1 || batch == -1) && (width == SENSOR_COUNT as i64 || width == -1),
        _ => false,
    };
    if !dims_ok {
        return Err(ModelUnavailable::Incompatible(format!(
            "input '{}' does not accept a [1, {}] tensor: {:?}",
            input.name, SENSOR_COUNT, input.input_type
        )));
    }

    match session.outputs.first() {
        Some(output) if output.output_type.tensor_type() == Some(TensorElementType::Float32) => Ok(()),
        Some(output) => Err(ModelUnavailable::Incompatible(format!(
            "output '{}' is not an f32 tensor: {:?}",
            output.name, output.output_type
        ))),
        None => Err(ModelUnavailable::Format("model defines no outputs".to_string())),
    }
}

impl InferenceCapability for OnnxModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let input_array = Array2::<f32>::from_shape_vec((1, SENSOR_COUNT), features.to_f32().to_vec())
            .map_err(|e| InferenceError::Runtime(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| InferenceError::Runtime("No output".to_string()))?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Runtime(format!("Extract error: {}", e)))?;

        let raw = data
            .first()
            .copied()
            .ok_or_else(|| InferenceError::Runtime("Empty output tensor".to_string()))?;

        Ok(f64::from(raw))
    }
}
