//! Prediction handler

use std::time::Instant;

use axum::{extract::State, Json};

use lactron_core::{PredictionEvent, PredictionObserver, PredictionResult};

use crate::models::PredictRequest;
use crate::{AppError, AppResult, AppState};

/// Predict shelf life from one set of sensor readings
pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> AppResult<Json<PredictionResult>> {
    let reading = req.into_reading();

    // ONNX inference locks the session, keep it off the async workers
    let predictor = state.predictor.clone();
    let (prediction, latency_us) = tokio::task::spawn_blocking(move || {
        let start_time = Instant::now();
        let prediction = predictor.predict_reading(&reading);
        (prediction, start_time.elapsed().as_micros() as u64)
    })
    .await
    .map_err(|e| AppError::InternalError(format!("prediction task failed: {}", e)))?;
    let prediction = prediction?;

    state
        .telemetry
        .on_prediction(&PredictionEvent::new(reading, &prediction, latency_us));

    Ok(Json(prediction.result))
}
