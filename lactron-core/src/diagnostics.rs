//! Diagnostics - replay a fixed battery through the predictor
//!
//! Smoke test for a running engine: known readings from fresh to spoiled,
//! with the active mode and configuration attached.

use std::time::Instant;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::PredictError;
use crate::model::ModelMetadata;
use crate::policy::{zones_for, SensorZone};
use crate::predictor::{InferenceMethod, InferenceMode, Predictor, PredictionResult};
use crate::sensor::{SensorReading, SensorTable};
use crate::telemetry::{PredictionEvent, PredictionObserver};

/// One named reading of the battery
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleCase {
    pub name: &'static str,
    pub reading: SensorReading,
}

/// Fresh to spoiled, plus an all-zero baseline
pub const SAMPLE_BATTERY: [SampleCase; 5] = [
    SampleCase { name: "Zero baseline", reading: SensorReading { ethanol: 0.0, ammonia: 0.0, h2s: 0.0 } },
    SampleCase { name: "Fresh milk", reading: SensorReading { ethanol: 10.0, ammonia: 3.0, h2s: 0.5 } },
    SampleCase { name: "Slightly aged", reading: SensorReading { ethanol: 25.0, ammonia: 12.0, h2s: 3.0 } },
    SampleCase { name: "Warning zone", reading: SensorReading { ethanol: 45.0, ammonia: 20.0, h2s: 6.0 } },
    SampleCase { name: "Spoiled", reading: SensorReading { ethanol: 90.0, ammonia: 45.0, h2s: 18.0 } },
];

#[derive(Debug, Clone, Serialize)]
pub struct SampleOutcome {
    pub name: &'static str,
    pub reading: SensorReading,
    pub result: PredictionResult,
    pub method: InferenceMethod,
    pub zones: SensorTable<SensorZone>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsReport {
    pub mode: InferenceMode,
    pub model_source: Option<String>,
    pub model_metadata: Option<ModelMetadata>,
    pub config: EngineConfig,
    pub samples: Vec<SampleOutcome>,
}

/// Run `cases` through `predictor`
/// Every sample is reported to `observer` like a served prediction
pub fn run_battery(
    predictor: &Predictor,
    cases: &[SampleCase],
    observer: &dyn PredictionObserver,
) -> Result<DiagnosticsReport, PredictError> {
    let samples = cases
        .iter()
        .map(|case| {
            let start_time = Instant::now();
            let prediction = predictor.predict_reading(&case.reading)?;
            let latency_us = start_time.elapsed().as_micros() as u64;
            observer.on_prediction(&PredictionEvent::new(case.reading, &prediction, latency_us));

            Ok(SampleOutcome {
                name: case.name,
                reading: case.reading,
                result: prediction.result,
                method: prediction.method,
                zones: zones_for(&case.reading, predictor.config()),
            })
        })
        .collect::<Result<Vec<_>, PredictError>>()?;

    Ok(DiagnosticsReport {
        mode: predictor.mode(),
        model_source: predictor.model().map(|m| m.source().to_string()),
        model_metadata: predictor.model().map(|m| m.metadata().clone()),
        config: predictor.config().clone(),
        samples,
    })
}
