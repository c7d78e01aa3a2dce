//! Prediction result data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Two-class probability distribution over the outcome labels.
///
/// Both values lie in [0, 1] and sum to 1 within floating rounding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub survival: f64,
    pub non_survival: f64,
}

/// Result of scoring one set of patient readings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurvivalPrediction {
    /// Unique prediction identifier
    pub prediction_id: String,

    /// Predicted class label, as declared by the classifier artifact
    pub label: String,

    /// Per-class probabilities
    pub probabilities: ClassProbabilities,

    /// Prediction timestamp
    pub timestamp: DateTime<Utc>,
}

impl SurvivalPrediction {
    pub fn new(label: String, survival: f64, non_survival: f64) -> Self {
        Self {
            prediction_id: uuid::Uuid::new_v4().to_string(),
            label,
            probabilities: ClassProbabilities {
                survival,
                non_survival,
            },
            timestamp: Utc::now(),
        }
    }

    /// Probability of survival as a percentage, rounded to one decimal
    /// place. This is the value rendered to the user.
    pub fn survival_percent(&self) -> f64 {
        (self.probabilities.survival * 1000.0).round() / 10.0
    }
}
