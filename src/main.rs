//! Survival Prediction Service - Main Entry Point
//!
//! Loads the model artifacts, validates them against each other, and serves
//! the prediction form and API over HTTP.

use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;
use survival_prediction_service::{
    config::{AppConfig, LoggingConfig},
    http::{self, ApiState},
    metrics::{MetricsReporter, PredictionMetrics},
    scoring::SurvivalScorer,
    ArtifactBundle,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging)?;

    info!("Starting Survival Prediction Service");
    info!(
        bind_addr = %config.server.bind_addr,
        artifacts_dir = %config.artifacts.dir,
        survival_class = %config.model.survival_class,
        "Configuration loaded"
    );

    // Artifacts are loaded and cross-validated once; a broken deployment
    // refuses to serve instead of producing wrong predictions per request.
    let artifacts = Arc::new(ArtifactBundle::load(&config.artifacts, &config.model)?);
    let scorer = Arc::new(SurvivalScorer::new(artifacts));

    let metrics = Arc::new(PredictionMetrics::new());
    let reporter_metrics = metrics.clone();
    let report_interval = config.metrics.report_interval_secs;
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(reporter_metrics, report_interval);
        reporter.start().await;
    });

    let state = ApiState {
        scorer,
        metrics,
        started_at: Instant::now(),
    };

    http::serve(&config.server.bind_addr, &config.server.cors_origins, state).await
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "survival_prediction_service={}",
            logging.level
        ))
    });

    match logging.format.as_str() {
        "json" => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    Ok(())
}
