//! Prediction request model
//!
//! Lenient by policy: an absent, null or unreadable field counts as 0 ppm.
//! Unreadable values are logged, never silently dropped.

use serde::Deserialize;
use serde_json::Value;

use lactron_core::SensorReading;

#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub ethanol: Option<Value>,
    #[serde(default)]
    pub ammonia: Option<Value>,
    #[serde(default)]
    pub h2s: Option<Value>,
}

impl PredictRequest {
    pub fn into_reading(self) -> SensorReading {
        SensorReading::new(
            coerce("ethanol", self.ethanol),
            coerce("ammonia", self.ammonia),
            coerce("h2s", self.h2s),
        )
    }
}

/// Numbers, numeric strings and booleans become f64; anything else is 0
fn coerce(field: &str, value: Option<Value>) -> f64 {
    let parsed = match &value {
        None | Some(Value::Null) => return 0.0,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        Some(_) => None,
    };

    match parsed {
        Some(v) if v.is_finite() => v,
        _ => {
            tracing::warn!("Non-numeric {} value {:?}, defaulting to 0", field, value);
            0.0
        }
    }
}
