//! Fitted per-column standard scaler

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, ScoringError};
use crate::types::FeatureRecord;

/// A standard scaler fitted by the external training pipeline: per-column
/// mean and scale over a fixed, ordered column set.
///
/// The transform maps each fitted column to `(value - mean) / scale`. It is
/// applied to the full column set in one call; the fitted columns form a
/// joint contract and transforming a partial record is not supported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Columns the scaler was fitted on, in fitting order
    pub columns: Vec<String>,
    /// Per-column mean
    pub mean: Vec<f64>,
    /// Per-column scale (standard deviation)
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Check internal consistency: matching lengths, finite parameters, no
    /// zero scales. Runs once at artifact load.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.columns.len() != self.mean.len() || self.columns.len() != self.scale.len() {
            return Err(ArtifactError::ScalerShape {
                columns: self.columns.len(),
                means: self.mean.len(),
                scales: self.scale.len(),
            });
        }

        for (idx, column) in self.columns.iter().enumerate() {
            let scale = self.scale[idx];
            if scale == 0.0 || !scale.is_finite() || !self.mean[idx].is_finite() {
                return Err(ArtifactError::DegenerateScale(column.clone()));
            }
        }

        Ok(())
    }

    /// Normalize every fitted column of `record` in place.
    ///
    /// The record must carry all fitted columns; a missing one means the
    /// record was assembled against a column list that has drifted from the
    /// scaler, which is a `TransformFailure`.
    pub fn transform(&self, record: &mut FeatureRecord) -> Result<(), ScoringError> {
        // Gather first so the record is untouched when any column is missing.
        let mut raw = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let value = record.get(column).ok_or_else(|| {
                ScoringError::TransformFailure(format!(
                    "record is missing fitted column `{column}`"
                ))
            })?;
            raw.push(value);
        }

        for (idx, column) in self.columns.iter().enumerate() {
            let normalized = (raw[idx] - self.mean[idx]) / self.scale[idx];
            record.insert(column, normalized);
        }

        Ok(())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaler() -> StandardScaler {
        StandardScaler {
            columns: vec!["a".to_string(), "b".to_string()],
            mean: vec![10.0, 2.0],
            scale: vec![5.0, 0.5],
        }
    }

    #[test]
    fn test_validate_accepts_consistent_scaler() {
        assert!(scaler().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_shape_mismatch() {
        let mut bad = scaler();
        bad.mean.pop();
        assert!(matches!(
            bad.validate(),
            Err(ArtifactError::ScalerShape { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_scale() {
        let mut bad = scaler();
        bad.scale[1] = 0.0;
        let err = bad.validate().unwrap_err();
        assert!(matches!(err, ArtifactError::DegenerateScale(ref c) if c == "b"));
    }

    #[test]
    fn test_transform_normalizes_all_fitted_columns() {
        let mut record = FeatureRecord::new();
        record.insert("a", 20.0);
        record.insert("b", 1.0);
        record.insert("severe_1", 1.0);

        scaler().transform(&mut record).unwrap();

        assert_eq!(record.get("a"), Some(2.0));
        assert_eq!(record.get("b"), Some(-2.0));
        // Columns outside the fitted set pass through unchanged.
        assert_eq!(record.get("severe_1"), Some(1.0));
    }

    #[test]
    fn test_transform_missing_column_fails_without_mutation() {
        let mut record = FeatureRecord::new();
        record.insert("a", 20.0);

        let err = scaler().transform(&mut record).unwrap_err();
        assert!(matches!(err, ScoringError::TransformFailure(_)));
        assert_eq!(record.get("a"), Some(20.0));
    }
}
