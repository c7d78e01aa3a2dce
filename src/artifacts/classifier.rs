//! Pre-trained linear support-vector classifier with Platt-scaled probabilities

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, ScoringError};

/// A binary linear SVM exported by the training pipeline.
///
/// Decision function: `f(x) = w·x + b`. The label is `classes[1]` when
/// `f(x) > 0`, otherwise `classes[0]`. Probabilities come from the fitted
/// Platt sigmoid `P(classes[1] | x) = 1 / (1 + exp(a·f(x) + b_platt))`.
/// Near the margin the Platt probabilities can disagree with the margin
/// label; the label follows the margin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvmClassifier {
    /// Ordered class labels the decision function discriminates between
    pub classes: [String; 2],
    /// One weight per input feature, in the model's feature order
    pub weights: Vec<f64>,
    /// Decision-function bias
    pub bias: f64,
    /// Platt sigmoid slope
    pub platt_a: f64,
    /// Platt sigmoid intercept
    pub platt_b: f64,
}

impl SvmClassifier {
    /// Check internal consistency once at artifact load.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.classes[0] == self.classes[1]
            || self.classes[0].is_empty()
            || self.classes[1].is_empty()
        {
            return Err(ArtifactError::ClassLabels);
        }
        if self.weights.iter().any(|w| !w.is_finite()) {
            return Err(ArtifactError::NonFiniteParameter("weights"));
        }
        if !self.bias.is_finite() {
            return Err(ArtifactError::NonFiniteParameter("bias"));
        }
        if !self.platt_a.is_finite() || !self.platt_b.is_finite() {
            return Err(ArtifactError::NonFiniteParameter("platt"));
        }
        Ok(())
    }

    /// Number of input features the model expects.
    pub fn feature_count(&self) -> usize {
        self.weights.len()
    }

    /// Predict the discrete class label for one feature row.
    pub fn predict(&self, features: &[f64]) -> Result<&str, ScoringError> {
        let decision = self.decision_function(features)?;
        if decision > 0.0 {
            Ok(&self.classes[1])
        } else {
            Ok(&self.classes[0])
        }
    }

    /// Per-class probabilities for one feature row, ordered as `classes`.
    pub fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], ScoringError> {
        let decision = self.decision_function(features)?;
        let positive = sigmoid(-(self.platt_a * decision + self.platt_b));
        Ok([1.0 - positive, positive])
    }

    fn decision_function(&self, features: &[f64]) -> Result<f64, ScoringError> {
        if features.len() != self.weights.len() {
            return Err(ScoringError::ConfigurationMismatch {
                feature: format!(
                    "model expects {} features, got {}",
                    self.weights.len(),
                    features.len()
                ),
            });
        }

        let dot: f64 = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum();
        Ok(dot + self.bias)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> SvmClassifier {
        SvmClassifier {
            classes: ["survived".to_string(), "deceased".to_string()],
            weights: vec![1.0, -2.0],
            bias: 0.5,
            platt_a: -1.5,
            platt_b: 0.0,
        }
    }

    #[test]
    fn test_predict_follows_decision_sign() {
        let model = classifier();

        // f = 1*2 - 2*0 + 0.5 = 2.5 > 0
        assert_eq!(model.predict(&[2.0, 0.0]).unwrap(), "deceased");
        // f = 1*0 - 2*1 + 0.5 = -1.5 <= 0
        assert_eq!(model.predict(&[0.0, 1.0]).unwrap(), "survived");
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let model = classifier();
        let proba = model.predict_proba(&[2.0, 0.3]).unwrap();

        assert!(proba[0] >= 0.0 && proba[0] <= 1.0);
        assert!(proba[1] >= 0.0 && proba[1] <= 1.0);
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_positive_margin_raises_positive_class_probability() {
        let model = classifier();

        let confident_positive = model.predict_proba(&[5.0, 0.0]).unwrap();
        let confident_negative = model.predict_proba(&[0.0, 5.0]).unwrap();

        assert!(confident_positive[1] > 0.9);
        assert!(confident_negative[1] < 0.1);
    }

    #[test]
    fn test_feature_count_mismatch_rejected() {
        let model = classifier();
        assert!(matches!(
            model.predict(&[1.0]),
            Err(ScoringError::ConfigurationMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_classes() {
        let mut model = classifier();
        model.classes[1] = "survived".to_string();
        assert!(matches!(model.validate(), Err(ArtifactError::ClassLabels)));
    }

    #[test]
    fn test_artifact_round_trip() {
        let json = r#"{
            "classes": ["survived", "deceased"],
            "weights": [0.94, 0.71, 0.48, -0.62, 1.13],
            "bias": -0.55,
            "platt_a": -1.73,
            "platt_b": 0.12
        }"#;

        let model: SvmClassifier = serde_json::from_str(json).unwrap();
        assert!(model.validate().is_ok());
        assert_eq!(model.feature_count(), 5);
        assert_eq!(model.classes[0], "survived");
    }
}
