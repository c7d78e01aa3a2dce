//! Artifact loading and cross-validation

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::artifacts::{StandardScaler, SvmClassifier};
use crate::config::{ArtifactsConfig, ModelConfig};
use crate::error::ArtifactError;
use crate::types::patient::columns;

/// Wire format of `columns.json`.
#[derive(Debug, Deserialize)]
struct ColumnsArtifact {
    numerical_cols: Vec<String>,
}

/// Wire format of `top_features.json`.
#[derive(Debug, Deserialize)]
struct TopFeaturesArtifact {
    top_features: Vec<String>,
}

/// The four startup artifacts, loaded, cross-validated, and frozen.
///
/// Constructed once at process start and shared read-only behind `Arc` for
/// the life of the process. Never mutated after load.
#[derive(Debug)]
pub struct ArtifactBundle {
    /// Fitted per-column scaler
    pub scaler: StandardScaler,
    /// Ordered column set the scaler was fitted on
    pub numerical_cols: Vec<String>,
    /// Ordered feature subset the classifier was trained on
    pub top_features: Vec<String>,
    /// Pre-trained binary classifier
    pub classifier: SvmClassifier,
    /// Index of the survival class within the classifier's class labels,
    /// resolved from configuration at load time
    pub survival_index: usize,
}

impl ArtifactBundle {
    /// Load all artifacts from the configured directory and cross-validate
    /// them against each other.
    pub fn load(artifacts: &ArtifactsConfig, model: &ModelConfig) -> Result<Self> {
        let dir = Path::new(&artifacts.dir);

        let scaler: StandardScaler = read_json(&dir.join(&artifacts.scaler_file))?;
        let columns: ColumnsArtifact = read_json(&dir.join(&artifacts.columns_file))?;
        let features: TopFeaturesArtifact = read_json(&dir.join(&artifacts.top_features_file))?;
        let classifier: SvmClassifier = read_json(&dir.join(&artifacts.model_file))?;

        let bundle = Self::assemble(
            scaler,
            columns.numerical_cols,
            features.top_features,
            classifier,
            &model.survival_class,
        )
        .context("artifact validation failed")?;

        info!(
            numerical_cols = bundle.numerical_cols.len(),
            top_features = bundle.top_features.len(),
            classes = ?bundle.classifier.classes,
            survival_class = %bundle.classifier.classes[bundle.survival_index],
            "Artifacts loaded"
        );

        Ok(bundle)
    }

    /// Build a bundle from already-deserialized artifacts, enforcing every
    /// cross-artifact invariant. This is the single gate both the loader and
    /// tests go through.
    pub fn assemble(
        scaler: StandardScaler,
        numerical_cols: Vec<String>,
        top_features: Vec<String>,
        classifier: SvmClassifier,
        survival_class: &str,
    ) -> Result<Self, ArtifactError> {
        scaler.validate()?;
        classifier.validate()?;

        // The scaler's fitted columns are authoritative; the separately
        // shipped column list must agree exactly, order included.
        if scaler.columns != numerical_cols {
            return Err(ArtifactError::ColumnDrift);
        }

        for feature in &top_features {
            if feature != columns::SEVERE && !numerical_cols.contains(feature) {
                return Err(ArtifactError::UnknownTopFeature(feature.clone()));
            }
        }

        if classifier.feature_count() != top_features.len() {
            return Err(ArtifactError::WeightCount {
                weights: classifier.feature_count(),
                features: top_features.len(),
            });
        }

        let survival_index = classifier
            .classes
            .iter()
            .position(|label| label == survival_class)
            .ok_or_else(|| ArtifactError::UnknownSurvivalClass(survival_class.to_string()))?;

        Ok(Self {
            scaler,
            numerical_cols,
            top_features,
            classifier,
            survival_index,
        })
    }

    /// Label of the class reported as survival.
    pub fn survival_label(&self) -> &str {
        &self.classifier.classes[self.survival_index]
    }

    /// Label of the complementary class.
    pub fn non_survival_label(&self) -> &str {
        &self.classifier.classes[1 - self.survival_index]
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!(path = %path.display(), "Loading artifact");

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read artifact {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse artifact {}", path.display()))
}
