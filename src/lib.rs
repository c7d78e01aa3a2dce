//! COVID-19 Survival Prediction Service Library
//!
//! A thin serving layer around a pre-trained clinical classifier: assembles
//! a feature record from patient readings, normalizes it with a fitted
//! scaler, projects it onto the model's top features, and scores it.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod scoring;
pub mod types;

pub use artifacts::{ArtifactBundle, StandardScaler, SvmClassifier};
pub use config::AppConfig;
pub use error::{ArtifactError, ScoringError};
pub use metrics::PredictionMetrics;
pub use scoring::SurvivalScorer;
pub use types::{FeatureRecord, PatientReadings, SurvivalPrediction};
