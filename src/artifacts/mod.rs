//! Startup-loaded model artifacts: scaler, classifier, and feature lists

pub mod classifier;
pub mod loader;
pub mod scaler;

pub use classifier::SvmClassifier;
pub use loader::ArtifactBundle;
pub use scaler::StandardScaler;
