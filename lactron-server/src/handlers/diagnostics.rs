//! Diagnostics handler

use axum::{extract::State, Json};

use lactron_core::diagnostics::{run_battery, DiagnosticsReport, SAMPLE_BATTERY};

use crate::{AppError, AppResult, AppState};

/// Replay the sample battery against the live predictor
pub async fn report(State(state): State<AppState>) -> AppResult<Json<DiagnosticsReport>> {
    let predictor = state.predictor.clone();
    let telemetry = state.telemetry.clone();

    let report = tokio::task::spawn_blocking(move || run_battery(&predictor, &SAMPLE_BATTERY, telemetry.as_ref()))
        .await
        .map_err(|e| AppError::InternalError(format!("diagnostics task failed: {}", e)))?
        .map_err(|e| AppError::InternalError(format!("sample battery rejected: {}", e)))?;

    tracing::debug!("Diagnostics battery replayed in {} mode", report.mode.as_str());

    Ok(Json(report))
}
