//! Central Configuration Constants
//!
//! Single source of truth for the engine defaults.
//! Values come from the training configuration of the shipped models;
//! change them here and nowhere else.

// ============================================================================
// NORMALIZATION RANGES (training distribution, ppm)
// ============================================================================

pub const ETHANOL_RANGE: (f64, f64) = (0.0, 150.0);
pub const AMMONIA_RANGE: (f64, f64) = (0.0, 80.0);
pub const H2S_RANGE: (f64, f64) = (0.0, 30.0);

// ============================================================================
// SPOILAGE THRESHOLDS (ppm)
// ============================================================================

/// Definite spoilage above 80 ppm ethanol
pub const ETHANOL_THRESHOLD: f64 = 80.0;

/// Definite spoilage above 40 ppm ammonia
pub const AMMONIA_THRESHOLD: f64 = 40.0;

/// Definite spoilage above 15 ppm hydrogen sulfide
pub const H2S_THRESHOLD: f64 = 15.0;

// ============================================================================
// ZONE BANDS (ppm, upper bounds inclusive)
// ============================================================================

pub const ETHANOL_FRESH_MAX: f64 = 20.0;
pub const ETHANOL_WARNING_MAX: f64 = 50.0;

pub const AMMONIA_FRESH_MAX: f64 = 10.0;
pub const AMMONIA_WARNING_MAX: f64 = 25.0;

pub const H2S_FRESH_MAX: f64 = 2.0;
pub const H2S_WARNING_MAX: f64 = 8.0;

// ============================================================================
// FORMULA WEIGHTS
// ============================================================================

/// H2S carries the most weight: strongest bacterial spoilage indicator.
pub const ETHANOL_WEIGHT: f64 = 0.30;
pub const AMMONIA_WEIGHT: f64 = 0.30;
pub const H2S_WEIGHT: f64 = 0.40;

/// Tolerance used when checking that the weights sum to 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

// ============================================================================
// SHELF LIFE
// ============================================================================

/// Prediction horizon in days
pub const SHELF_LIFE_HORIZON_DAYS: f64 = 7.0;

/// Decimal places kept on reported shelf life
pub const SHELF_LIFE_DECIMALS: i32 = 2;

// ============================================================================
// CONFIDENCE LABELS
// ============================================================================

pub const GRADIENT_BOOSTED_CONFIDENCE: f64 = 0.95;
pub const NEURAL_NETWORK_CONFIDENCE: f64 = 0.92;
pub const FORMULA_CONFIDENCE: f64 = 0.78;

// ============================================================================
// MODEL ARTIFACTS
// ============================================================================

/// Tree ensemble exported as JSON
pub const TREE_MODEL_FILE: &str = "shelf_life_model.json";

/// Neural network exported as ONNX
pub const ONNX_MODEL_FILE: &str = "shelf_life_model.onnx";

/// Sidecar metadata suffix (`model.onnx` -> `model.onnx.json`)
pub const METADATA_SUFFIX: &str = ".json";

/// Tolerance when comparing declared artifact ranges with the configuration
pub const METADATA_TOLERANCE: f64 = 1e-6;

/// Engine version
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
