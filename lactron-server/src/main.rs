//! LACTRON Prediction Server
//!
//! HTTP front for the shelf-life engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    LACTRON SERVER                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌─────────────────┐   ┌─────────────────┐  │
//! │  │  API      │──►│  Predictor      │──►│  Telemetry      │  │
//! │  │  (Axum)   │   │  (lactron-core) │   │  (stats + logs) │  │
//! │  └───────────┘   └────────┬────────┘   └─────────────────┘  │
//! │                           ▼                                 │
//! │              ┌─────────────────────────┐                    │
//! │              │ Model artifacts (once)  │                    │
//! │              │ tree JSON ─► ONNX ─► ∅  │                    │
//! │              └─────────────────────────┘                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod handlers;
mod error;


use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lactron_core::model::{default_strategies, load_first};
use lactron_core::{EngineConfig, Predictor, Telemetry};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "lactron_server=debug,lactron_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env();

    tracing::info!("LACTRON prediction server starting...");
    tracing::info!("Environment: {}", config.environment);

    // Build application state (aborts on invalid engine configuration)
    let state = build_state(config.clone())?;

    match state.predictor.model() {
        Some(model) => tracing::info!(
            "Inference mode: model ({}, confidence {}) from {}",
            model.provenance(),
            model.provenance().confidence(),
            model.source()
        ),
        None => tracing::info!("Inference mode: formula fallback"),
    }

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
    pub telemetry: Arc<Telemetry>,
    pub config: config::Config,
}

/// Validate the engine configuration, load a model if one is available
fn build_state(config: config::Config) -> anyhow::Result<AppState> {
    let engine_config = EngineConfig::default();
    engine_config.validate().context("invalid engine configuration")?;

    let model = if config.model_loading {
        tracing::info!("Searching for model artifacts in {}", config.model_dir.display());
        load_first(&default_strategies(&config.model_dir), &engine_config)
    } else {
        tracing::info!("Model loading disabled, using formula fallback");
        None
    };

    let predictor = Predictor::new(engine_config, model).context("invalid engine configuration")?;

    Ok(AppState {
        predictor: Arc::new(predictor),
        telemetry: Arc::new(Telemetry::new()),
        config,
    })
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .route("/diagnostics", get(handlers::diagnostics::report))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
