//! Prediction request assembly and scoring
//!
//! Builds a single-row feature record from validated patient readings,
//! normalizes it with the fitted scaler, projects it onto the model's
//! top-feature subset, and scores it with the pre-trained classifier.

use std::sync::Arc;
use tracing::debug;

use crate::artifacts::ArtifactBundle;
use crate::error::ScoringError;
use crate::types::patient::columns;
use crate::types::{FeatureRecord, PatientReadings, SurvivalPrediction};

/// The assemble-and-score pipeline over an immutable artifact bundle.
///
/// Stateless per request; safe to share across concurrent requests since the
/// bundle is never mutated post-load.
pub struct SurvivalScorer {
    artifacts: Arc<ArtifactBundle>,
}

impl SurvivalScorer {
    pub fn new(artifacts: Arc<ArtifactBundle>) -> Self {
        Self { artifacts }
    }

    pub fn artifacts(&self) -> &ArtifactBundle {
        &self.artifacts
    }

    /// Assemble the normalized feature record for one set of readings.
    ///
    /// Inserts the four readings under their canonical column names, fills
    /// every remaining scaler column with the 0.0 placeholder (a documented
    /// simplification, not a statistical imputation), normalizes the full
    /// numerical column set in a single scaler call, and appends the
    /// severity indicator unscaled.
    pub fn assemble(&self, readings: &PatientReadings) -> Result<FeatureRecord, ScoringError> {
        let numerical_cols = &self.artifacts.numerical_cols;
        let mut record = FeatureRecord::with_capacity(numerical_cols.len() + 1);

        record.insert(columns::LDH, readings.ldh);
        record.insert(columns::IL6, readings.il6);
        record.insert(columns::NEUTROPHIL_PCT, readings.neutrophil_pct);
        record.insert(columns::LCR, readings.lcr);

        for column in numerical_cols {
            if !record.contains(column) {
                record.insert(column, 0.0);
            }
        }

        // One joint call over the full fitted column set; the scaler may
        // not be applied column-by-column.
        self.artifacts.scaler.transform(&mut record)?;

        record.insert(columns::SEVERE, f64::from(readings.severe));

        Ok(record)
    }

    /// Score one set of validated readings.
    ///
    /// Returns the predicted label and the two-class probability
    /// distribution, with the survival probability taken from the class
    /// index resolved at artifact load. Any missing top feature aborts the
    /// request with a configuration-mismatch diagnostic rather than
    /// producing a wrong prediction.
    pub fn score(&self, readings: &PatientReadings) -> Result<SurvivalPrediction, ScoringError> {
        let record = self.assemble(readings)?;
        let row = record.project(&self.artifacts.top_features)?;

        let label = self.artifacts.classifier.predict(&row)?.to_string();
        let proba = self.artifacts.classifier.predict_proba(&row)?;

        let survival = proba[self.artifacts.survival_index];
        let non_survival = proba[1 - self.artifacts.survival_index];

        debug!(
            label = %label,
            survival_probability = survival,
            "Scored patient readings"
        );

        Ok(SurvivalPrediction::new(label, survival, non_survival))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{StandardScaler, SvmClassifier};

    fn fixture_bundle() -> Arc<ArtifactBundle> {
        let scaler = StandardScaler {
            columns: vec![
                "LDH".to_string(),
                "IL6".to_string(),
                "Neutrophil %".to_string(),
                "LCR".to_string(),
                "CRP".to_string(),
                "Ferritin".to_string(),
            ],
            mean: vec![420.0, 28.0, 74.0, 18.0, 62.0, 610.0],
            scale: vec![210.0, 35.0, 12.0, 22.0, 58.0, 420.0],
        };
        let classifier = SvmClassifier {
            classes: ["survived".to_string(), "deceased".to_string()],
            weights: vec![0.94, 0.71, 0.48, -0.62, 1.13],
            bias: -0.55,
            platt_a: -1.73,
            platt_b: 0.12,
        };
        let numerical_cols = scaler.columns.clone();
        let top_features = vec![
            "LDH".to_string(),
            "IL6".to_string(),
            "Neutrophil %".to_string(),
            "LCR".to_string(),
            "severe_1".to_string(),
        ];

        Arc::new(
            ArtifactBundle::assemble(scaler, numerical_cols, top_features, classifier, "survived")
                .unwrap(),
        )
    }

    fn scorer() -> SurvivalScorer {
        SurvivalScorer::new(fixture_bundle())
    }

    #[test]
    fn test_missing_columns_default_to_zero_before_scaling() {
        // An identity scaler leaves the placeholder visible in the output.
        let scaler = StandardScaler {
            columns: vec!["LDH".to_string(), "CRP".to_string()],
            mean: vec![0.0, 0.0],
            scale: vec![1.0, 1.0],
        };
        let classifier = SvmClassifier {
            classes: ["survived".to_string(), "deceased".to_string()],
            weights: vec![1.0],
            bias: 0.0,
            platt_a: -1.0,
            platt_b: 0.0,
        };
        let bundle = ArtifactBundle::assemble(
            scaler,
            vec!["LDH".to_string(), "CRP".to_string()],
            vec!["LDH".to_string()],
            classifier,
            "survived",
        )
        .unwrap();
        let scorer = SurvivalScorer::new(Arc::new(bundle));

        let record = scorer
            .assemble(&PatientReadings::new(500.0, 10.0, 70.0, 2.5, 0))
            .unwrap();

        assert_eq!(record.get("CRP"), Some(0.0));
        assert_eq!(record.get("LDH"), Some(500.0));
    }

    #[test]
    fn test_assembled_record_carries_severity_unscaled() {
        let record = scorer()
            .assemble(&PatientReadings::new(500.0, 10.0, 70.0, 2.5, 1))
            .unwrap();

        assert_eq!(record.get("severe_1"), Some(1.0));
    }

    #[test]
    fn test_reference_scenario_is_deterministic() {
        let scorer = scorer();
        let readings = PatientReadings::new(500.0, 10.0, 70.0, 2.5, 1);

        let first = scorer.score(&readings).unwrap();
        let second = scorer.score(&readings).unwrap();

        assert_eq!(first.label, second.label);
        assert_eq!(
            first.probabilities.survival,
            second.probabilities.survival
        );
        let sum = first.probabilities.survival + first.probabilities.non_survival;
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_zero_readings_produce_valid_probabilities() {
        let prediction = scorer()
            .score(&PatientReadings::new(0.0, 0.0, 0.0, 0.0, 0))
            .unwrap();

        let p = prediction.probabilities;
        assert!(p.survival >= 0.0 && p.survival <= 1.0);
        assert!(p.non_survival >= 0.0 && p.non_survival <= 1.0);
        assert!((p.survival + p.non_survival - 1.0).abs() < 1e-12);
        assert!(prediction.survival_percent() >= 0.0 && prediction.survival_percent() <= 100.0);
    }

    #[test]
    fn test_survival_probability_follows_configured_class() {
        // Same artifacts, survival class flipped: the reported survival
        // probability must flip with it.
        let bundle = fixture_bundle();
        let flipped = ArtifactBundle::assemble(
            bundle.scaler.clone(),
            bundle.numerical_cols.clone(),
            bundle.top_features.clone(),
            bundle.classifier.clone(),
            "deceased",
        )
        .unwrap();

        let readings = PatientReadings::new(500.0, 10.0, 70.0, 2.5, 1);
        let base = SurvivalScorer::new(bundle).score(&readings).unwrap();
        let swapped = SurvivalScorer::new(Arc::new(flipped))
            .score(&readings)
            .unwrap();

        assert!(
            (base.probabilities.survival - swapped.probabilities.non_survival).abs() < 1e-12
        );
    }

    #[test]
    fn test_unknown_top_feature_aborts_scoring() {
        // Bypass bundle validation to model a drifted deployment.
        let valid = fixture_bundle();
        let mut top_features = valid.top_features.clone();
        top_features.push("D-dimer".to_string());
        let mut classifier = valid.classifier.clone();
        classifier.weights.push(0.3);

        let drifted = ArtifactBundle {
            scaler: valid.scaler.clone(),
            numerical_cols: valid.numerical_cols.clone(),
            top_features,
            classifier,
            survival_index: valid.survival_index,
        };

        let err = SurvivalScorer::new(Arc::new(drifted))
            .score(&PatientReadings::new(500.0, 10.0, 70.0, 2.5, 1))
            .unwrap_err();

        assert!(
            matches!(err, ScoringError::ConfigurationMismatch { ref feature } if feature == "D-dimer")
        );
    }
}
