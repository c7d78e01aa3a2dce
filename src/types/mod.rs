//! Type definitions for the prediction service

pub mod patient;
pub mod prediction;
pub mod record;

pub use patient::PatientReadings;
pub use prediction::{ClassProbabilities, SurvivalPrediction};
pub use record::FeatureRecord;
