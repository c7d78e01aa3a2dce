//! Configuration management for the survival prediction service

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Allowed CORS origins; `*` or an empty list allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Locations of the startup-loaded model artifacts
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    /// Directory containing the artifact files
    #[serde(default = "default_artifacts_dir")]
    pub dir: String,
    #[serde(default = "default_scaler_file")]
    pub scaler_file: String,
    #[serde(default = "default_columns_file")]
    pub columns_file: String,
    #[serde(default = "default_top_features_file")]
    pub top_features_file: String,
    #[serde(default = "default_model_file")]
    pub model_file: String,
}

/// Class-label conventions of the deployed model
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// The class label reported as survival. Must name one of the
    /// classifier artifact's declared class labels; resolution happens at
    /// artifact load, never by assuming an index convention.
    #[serde(default = "default_survival_class")]
    pub survival_class: String,
}

/// Metrics reporting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Seconds between periodic metrics summaries in the log
    #[serde(default = "default_report_interval")]
    pub report_interval_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_artifacts_dir() -> String {
    "artifacts".to_string()
}

fn default_scaler_file() -> String {
    "scaler.json".to_string()
}

fn default_columns_file() -> String {
    "columns.json".to_string()
}

fn default_top_features_file() -> String {
    "top_features.json".to_string()
}

fn default_model_file() -> String {
    "model.json".to_string()
}

fn default_survival_class() -> String {
    "survived".to_string()
}

fn default_report_interval() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cors_origins: Vec::new(),
        }
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: default_artifacts_dir(),
            scaler_file: default_scaler_file(),
            columns_file: default_columns_file(),
            top_features_file: default_top_features_file(),
            model_file: default_model_file(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            survival_class: default_survival_class(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            report_interval_secs: default_report_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
