//! HTTP surface: input form, prediction endpoint, health endpoint

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, info};

use crate::error::ScoringError;
use crate::metrics::PredictionMetrics;
use crate::scoring::SurvivalScorer;
use crate::types::{ClassProbabilities, PatientReadings};

#[derive(Clone)]
pub struct ApiState {
    pub scorer: Arc<SurvivalScorer>,
    pub metrics: Arc<PredictionMetrics>,
    pub started_at: Instant,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction_id: String,
    pub label: String,
    /// Probability of survival as a percentage, one decimal place
    pub survival_percent: f64,
    pub probabilities: ClassProbabilities,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub classes: [String; 2],
    pub survival_class: String,
    pub top_features: usize,
    pub numerical_cols: usize,
    pub uptime_secs: u64,
}

pub async fn serve(addr: &str, cors_origins: &[String], state: ApiState) -> anyhow::Result<()> {
    let app = router(cors_origins, state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "HTTP server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(cors_origins: &[String], state: ApiState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/predict", post(predict))
        .route("/api/health", get(health))
        .with_state(state)
        .layer(cors_layer(cors_origins))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn predict(
    State(state): State<ApiState>,
    Json(readings): Json<PatientReadings>,
) -> Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    let start = Instant::now();

    readings.validate().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    match state.scorer.score(&readings) {
        Ok(prediction) => {
            state.metrics.record_prediction(
                start.elapsed(),
                prediction.probabilities.survival,
                &prediction.label,
            );

            Ok(Json(PredictResponse {
                survival_percent: prediction.survival_percent(),
                prediction_id: prediction.prediction_id,
                label: prediction.label,
                probabilities: prediction.probabilities,
                timestamp: prediction.timestamp,
            }))
        }
        Err(e) => {
            state.metrics.record_failure();
            error!(error = %e, "Scoring failed");

            let status = match e {
                ScoringError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                ScoringError::ConfigurationMismatch { .. } | ScoringError::TransformFailure(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            Err((
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let artifacts = state.scorer.artifacts();

    Json(HealthResponse {
        status: "ok".to_string(),
        classes: artifacts.classifier.classes.clone(),
        survival_class: artifacts.survival_label().to_string(),
        top_features: artifacts.top_features.len(),
        numerical_cols: artifacts.numerical_cols.len(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let mut cors = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let list = origins
            .iter()
            .filter_map(|origin| origin.trim().parse::<HeaderValue>().ok())
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(AllowOrigin::list(list))
    };

    cors = cors.allow_methods([Method::GET, Method::POST]);
    cors.allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>COVID-19 Survival Prediction</title>
<style>
  body { background-color: #CAF4FF; font-family: sans-serif; margin: 0; }
  .wrap { max-width: 640px; margin: 2em auto; padding: 0 1em; }
  h1 { color: blue; font-size: 2.2em; }
  .description { color: gray; font-size: 1.1em; font-weight: bold; }
  label { display: block; color: black; font-size: 1.1em; font-weight: bold; margin-top: 1em; }
  input[type=number] { width: 200px; color: black; background-color: #fff;
    border: 2px solid #ff6f61; border-radius: 4px; padding: 4px; }
  button { background-color: #ff6f61; color: #fff; border: none; border-radius: 4px;
    font-size: 1.1em; font-weight: bold; padding: 8px 20px; margin-top: 1.5em; cursor: pointer; }
  #result { color: darkgreen; font-size: 1.6em; font-weight: bold; margin-top: 1em; }
  #error { color: #b00020; font-weight: bold; margin-top: 1em; }
</style>
</head>
<body>
<div class="wrap">
  <h1>COVID-19 Survival Prediction</h1>
  <p class="description">
    Enter the laboratory readings below to estimate the probability of
    survival from a pre-trained clinical model.
  </p>
  <form id="predict-form">
    <label>Enter LDH level:
      <input type="number" name="ldh" min="0" step="0.1" value="0" required></label>
    <label>Enter IL6 level:
      <input type="number" name="il6" min="0" step="0.1" value="0" required></label>
    <label>Enter Neutrophil percentage:
      <input type="number" name="neutrophil_pct" min="0" step="0.1" value="0" required></label>
    <label>Enter Lymphocyte to CRP ratio (LCR):
      <input type="number" name="lcr" min="0" step="0.1" value="0" required></label>
    <label>Severity (severe = 1, not severe = 0):
      <input type="number" name="severe" min="0" max="1" step="1" value="0" required></label>
    <button type="submit">Predict</button>
  </form>
  <div id="result"></div>
  <div id="error"></div>
</div>
<script>
document.getElementById('predict-form').addEventListener('submit', async (e) => {
  e.preventDefault();
  const form = new FormData(e.target);
  const body = {
    ldh: parseFloat(form.get('ldh')),
    il6: parseFloat(form.get('il6')),
    neutrophil_pct: parseFloat(form.get('neutrophil_pct')),
    lcr: parseFloat(form.get('lcr')),
    severe: parseInt(form.get('severe'), 10),
  };
  const resultEl = document.getElementById('result');
  const errorEl = document.getElementById('error');
  resultEl.textContent = '';
  errorEl.textContent = '';
  try {
    const resp = await fetch('/api/predict', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify(body),
    });
    const data = await resp.json();
    if (!resp.ok) {
      errorEl.textContent = data.error || 'Prediction failed';
      return;
    }
    resultEl.textContent =
      'Probability of Survival (Percent): ' + data.survival_percent.toFixed(1);
  } catch (err) {
    errorEl.textContent = 'Request failed: ' + err;
  }
});
</script>
</body>
</html>
"#;
