//! Error taxonomy for scoring and artifact validation

use thiserror::Error;

/// Errors raised on the per-request scoring path.
///
/// All three variants are non-recoverable for the request that hit them and
/// must surface to the caller as a visible error, never as a fallback
/// prediction.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// A top feature is missing from the assembled record. The deployed
    /// artifacts are inconsistent with each other.
    #[error("top feature `{feature}` is not present in the assembled record; deployed artifacts are inconsistent")]
    ConfigurationMismatch { feature: String },

    /// A form value was out of range or malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The scaler was handed a record that does not carry its fitted column
    /// set. Indicates drift between the scaler and the column-list artifacts.
    #[error("scaler transform failed: {0}")]
    TransformFailure(String),
}

/// Errors raised while loading and cross-validating the startup artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("scaler column/mean/scale lengths differ ({columns}/{means}/{scales})")]
    ScalerShape {
        columns: usize,
        means: usize,
        scales: usize,
    },

    #[error("scaler column `{0}` has a zero or non-finite scale")]
    DegenerateScale(String),

    #[error("numerical column list does not match the scaler's fitted columns")]
    ColumnDrift,

    #[error("model declares {weights} weights but {features} top features are configured")]
    WeightCount { weights: usize, features: usize },

    #[error("top feature `{0}` is neither a scaler column nor the severity indicator")]
    UnknownTopFeature(String),

    #[error("model class labels must be two distinct labels")]
    ClassLabels,

    #[error("survival class `{0}` is not one of the model's class labels")]
    UnknownSurvivalClass(String),

    #[error("model parameter `{0}` is non-finite")]
    NonFiniteParameter(&'static str),
}
