//! Health check handler
//!
//! Liveness plus engine status. Never runs a prediction.

use axum::{extract::State, Json};
use serde::Serialize;

use lactron_core::telemetry::StatsSnapshot;
use lactron_core::Provenance;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
    timestamp: i64,
    model_loaded: bool,
    mode: &'static str,
    provenance: Option<Provenance>,
    model_version: Option<String>,
    stats: StatsSnapshot,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let model = state.predictor.model();

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        timestamp: chrono::Utc::now().timestamp(),
        model_loaded: model.is_some(),
        mode: state.predictor.mode().as_str(),
        provenance: model.map(|m| m.provenance()),
        model_version: model.and_then(|m| m.metadata().model_version.clone()),
        stats: state.telemetry.stats(),
    })
}
