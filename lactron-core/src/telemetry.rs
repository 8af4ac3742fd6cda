//! Prediction Telemetry
//!
//! Side channel for what the predictor did. The predictor itself never logs
//! or counts; callers time the call and hand the event to an observer.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::policy::Status;
use crate::predictor::{InferenceMethod, Prediction, PredictionResult};
use crate::sensor::SensorReading;

// ============================================================================
// EVENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionEvent {
    pub reading: SensorReading,
    pub result: PredictionResult,
    pub method: InferenceMethod,
    pub latency_us: u64,
}

impl PredictionEvent {
    pub fn new(reading: SensorReading, prediction: &Prediction, latency_us: u64) -> Self {
        Self {
            reading,
            result: prediction.result,
            method: prediction.method.clone(),
            latency_us,
        }
    }
}

/// Receives one event per served prediction
pub trait PredictionObserver: Send + Sync {
    fn on_prediction(&self, event: &PredictionEvent);
}

// ============================================================================
// STATS
// ============================================================================

/// Lock-free counters
#[derive(Debug, Default)]
pub struct InferenceStats {
    total: AtomicU64,
    model: AtomicU64,
    formula: AtomicU64,
    degraded: AtomicU64,
    spoiled: AtomicU64,
    latency_sum_us: AtomicU64,
}

/// Point-in-time copy for status endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub inference_count: u64,
    pub model_count: u64,
    pub formula_count: u64,
    pub degraded_count: u64,
    pub spoiled_count: u64,
    pub avg_latency_ms: f32,
}

impl InferenceStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: &PredictionEvent) {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.latency_sum_us.fetch_add(event.latency_us, Ordering::Relaxed);

        let counter = match event.method {
            InferenceMethod::Model { .. } => &self.model,
            InferenceMethod::Formula => &self.formula,
            InferenceMethod::Degraded { .. } => &self.degraded,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        if event.result.status == Status::Spoiled {
            self.spoiled.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let count = self.total.load(Ordering::Relaxed);
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        StatsSnapshot {
            inference_count: count,
            model_count: self.model.load(Ordering::Relaxed),
            formula_count: self.formula.load(Ordering::Relaxed),
            degraded_count: self.degraded.load(Ordering::Relaxed),
            spoiled_count: self.spoiled.load(Ordering::Relaxed),
            avg_latency_ms: avg,
        }
    }
}

// ============================================================================
// DEFAULT OBSERVER
// ============================================================================

/// Counts every event and writes it to the log
#[derive(Debug, Default)]
pub struct Telemetry {
    stats: InferenceStats,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl PredictionObserver for Telemetry {
    fn on_prediction(&self, event: &PredictionEvent) {
        self.stats.record(event);

        match &event.method {
            InferenceMethod::Degraded { reason } => {
                log::warn!("Model inference failed ({}), answered with formula", reason);
            }
            method => {
                log::debug!(
                    "prediction ethanol={} ammonia={} h2s={} -> {} {:.2}d conf={} via {:?} in {}us",
                    event.reading.ethanol,
                    event.reading.ammonia,
                    event.reading.h2s,
                    event.result.status.as_str(),
                    event.result.shelf_life,
                    event.result.confidence,
                    method,
                    event.latency_us
                );
            }
        }
    }
}
