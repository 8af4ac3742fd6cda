//! LACTRON Core - milk shelf-life prediction engine
//!
//! Three volatile-gas readings (ethanol, ammonia, hydrogen sulfide) in,
//! `{status, shelf_life, confidence}` out.
//!
//! # Architecture
//!
//! ```text
//! reading ──► Predictor ──┬─► Normalizer ─► LoadedModel ─┐
//!                         │   (model-backed)             ├─► spoilage policy ─► PredictionResult
//!                         └─► quality formula ───────────┘
//!                             (formula fallback)
//! ```
//!
//! The model is loaded once at startup by an ordered list of
//! [`model::ModelLoader`] strategies and injected into the [`Predictor`].

pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod normalize;
pub mod policy;
pub mod predictor;
pub mod sensor;
pub mod telemetry;

#[cfg(test)]
mod tests;

pub use config::{EngineConfig, NormalizationRange, ZoneBand};
pub use error::{ConfigurationError, InferenceError, ModelUnavailable, PredictError};
pub use model::{InferenceCapability, LoadedModel, Provenance};
pub use normalize::{FeatureVector, Normalizer};
pub use policy::{SensorZone, Status};
pub use predictor::{InferenceMethod, InferenceMode, Prediction, PredictionResult, Predictor};
pub use sensor::{Sensor, SensorReading, SensorTable};
pub use telemetry::{PredictionEvent, PredictionObserver, Telemetry};
