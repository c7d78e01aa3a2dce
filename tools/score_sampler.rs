//! Score Sampler
//!
//! Generates random patient readings and scores them through the loaded
//! artifacts, for smoke-testing a deployment and eyeballing the score
//! distribution.

use anyhow::Result;
use rand::Rng;
use std::sync::Arc;
use survival_prediction_service::{
    config::AppConfig, scoring::SurvivalScorer, ArtifactBundle, PatientReadings,
};
use tracing::info;

/// Reading generator for smoke testing
struct ReadingsGenerator {
    rng: rand::rngs::ThreadRng,
}

impl ReadingsGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Generate readings in the range typical of a mild course
    fn generate_mild(&mut self) -> PatientReadings {
        PatientReadings::new(
            self.rng.gen_range(150.0..400.0),
            self.rng.gen_range(0.0..30.0),
            self.rng.gen_range(40.0..75.0),
            self.rng.gen_range(10.0..60.0),
            0,
        )
    }

    /// Generate readings in the range typical of a severe course
    fn generate_severe(&mut self) -> PatientReadings {
        PatientReadings::new(
            self.rng.gen_range(400.0..1200.0),
            self.rng.gen_range(30.0..300.0),
            self.rng.gen_range(70.0..95.0),
            self.rng.gen_range(0.0..10.0),
            1,
        )
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("score_sampler=info".parse()?),
        )
        .init();

    info!("Starting Score Sampler");

    let args: Vec<String> = std::env::args().collect();
    let config_path = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("config/config.toml");
    let count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);
    let severe_rate: f64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(0.3);

    info!(
        config = %config_path,
        count = count,
        severe_rate = severe_rate,
        "Configuration loaded"
    );

    let config = AppConfig::load_from_path(config_path)?;
    let artifacts = Arc::new(ArtifactBundle::load(&config.artifacts, &config.model)?);
    let scorer = SurvivalScorer::new(artifacts);

    let mut generator = ReadingsGenerator::new();
    let mut rng = rand::thread_rng();

    let mut survived = 0u64;
    let mut deceased = 0u64;
    let mut percent_sum = 0.0;

    for i in 0..count {
        let readings = if rng.gen_bool(severe_rate) {
            generator.generate_severe()
        } else {
            generator.generate_mild()
        };

        let prediction = scorer.score(&readings)?;
        percent_sum += prediction.survival_percent();

        if prediction.label == scorer.artifacts().survival_label() {
            survived += 1;
        } else {
            deceased += 1;
        }

        if (i + 1) % 10 == 0 {
            info!(
                scored = i + 1,
                total = count,
                last_survival_percent = prediction.survival_percent(),
                "Scoring progress"
            );
        }
    }

    info!(
        scored = count,
        predicted_survival = survived,
        predicted_non_survival = deceased,
        mean_survival_percent = format!("{:.1}", percent_sum / count as f64),
        "Completed"
    );

    Ok(())
}
