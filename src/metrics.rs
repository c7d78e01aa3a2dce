//! Performance metrics and statistics tracking for the prediction service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for the scoring path
pub struct PredictionMetrics {
    /// Total predictions served
    pub predictions_served: AtomicU64,
    /// Total requests that failed scoring
    pub scoring_failures: AtomicU64,
    /// Predictions by predicted class label
    outcomes: RwLock<HashMap<String, u64>>,
    /// Request processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Survival probability distribution buckets
    probability_buckets: RwLock<[u64; 10]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl PredictionMetrics {
    pub fn new() -> Self {
        Self {
            predictions_served: AtomicU64::new(0),
            scoring_failures: AtomicU64::new(0),
            outcomes: RwLock::new(HashMap::new()),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            probability_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a served prediction
    pub fn record_prediction(&self, processing_time: Duration, survival_probability: f64, label: &str) {
        self.predictions_served.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only the most recent window for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        let bucket = (survival_probability * 10.0).min(9.0).max(0.0) as usize;
        if let Ok(mut buckets) = self.probability_buckets.write() {
            buckets[bucket] += 1;
        }

        if let Ok(mut outcomes) = self.outcomes.write() {
            *outcomes.entry(label.to_string()).or_insert(0) += 1;
        }
    }

    /// Record a request that failed scoring
    pub fn record_failure(&self) {
        self.scoring_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let times = self.processing_times.read().unwrap();
        if times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (predictions per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.predictions_served.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get survival probability distribution
    pub fn get_probability_distribution(&self) -> [u64; 10] {
        *self.probability_buckets.read().unwrap()
    }

    /// Get prediction counts per class label
    pub fn get_outcomes(&self) -> HashMap<String, u64> {
        self.outcomes.read().unwrap().clone()
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let served = self.predictions_served.load(Ordering::Relaxed);
        let failures = self.scoring_failures.load(Ordering::Relaxed);
        let processing = self.get_processing_stats();
        let outcomes = self.get_outcomes();
        let distribution = self.get_probability_distribution();

        info!(
            predictions_served = served,
            scoring_failures = failures,
            throughput = format!("{:.2}/s", self.get_throughput()),
            "Prediction metrics summary"
        );
        info!(
            mean_us = processing.mean_us,
            p50_us = processing.p50_us,
            p95_us = processing.p95_us,
            p99_us = processing.p99_us,
            "Request processing time"
        );

        for (label, count) in &outcomes {
            let pct = if served > 0 {
                (*count as f64 / served as f64) * 100.0
            } else {
                0.0
            };
            info!(label = %label, count = count, percent = format!("{pct:.1}"), "Outcome");
        }

        let total: u64 = distribution.iter().sum();
        if total > 0 {
            for (i, &count) in distribution.iter().enumerate() {
                if count == 0 {
                    continue;
                }
                info!(
                    bucket = format!("{:.1}-{:.1}", i as f64 / 10.0, (i + 1) as f64 / 10.0),
                    count = count,
                    "Survival probability bucket"
                );
            }
        }
    }
}

impl Default for PredictionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Real-time metrics reporter that logs periodic summaries
pub struct MetricsReporter {
    metrics: std::sync::Arc<PredictionMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: std::sync::Arc<PredictionMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = PredictionMetrics::new();

        metrics.record_prediction(Duration::from_micros(100), 0.8, "survived");
        metrics.record_prediction(Duration::from_micros(200), 0.2, "deceased");
        metrics.record_failure();

        assert_eq!(metrics.predictions_served.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.scoring_failures.load(Ordering::Relaxed), 1);

        let outcomes = metrics.get_outcomes();
        assert_eq!(outcomes.get("survived"), Some(&1));
        assert_eq!(outcomes.get("deceased"), Some(&1));
    }

    #[test]
    fn test_probability_buckets() {
        let metrics = PredictionMetrics::new();

        metrics.record_prediction(Duration::from_micros(100), 0.05, "deceased");
        metrics.record_prediction(Duration::from_micros(100), 0.95, "survived");
        metrics.record_prediction(Duration::from_micros(100), 1.0, "survived");

        let distribution = metrics.get_probability_distribution();
        assert_eq!(distribution[0], 1);
        // A probability of exactly 1.0 lands in the top bucket.
        assert_eq!(distribution[9], 2);
    }

    #[test]
    fn test_processing_stats() {
        let metrics = PredictionMetrics::new();

        for us in [100, 200, 300, 400, 500] {
            metrics.record_prediction(Duration::from_micros(us), 0.5, "survived");
        }

        let stats = metrics.get_processing_stats();
        assert_eq!(stats.count, 5);
        assert_eq!(stats.mean_us, 300);
        assert_eq!(stats.max_us, 500);
    }
}
