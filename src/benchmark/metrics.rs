//! Round-trip metrics collection
//!
//! Latency percentiles, transport error counts and the per-run tally the
//! driver feeds with every completed iteration or chunk.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::http::HttpError;
use crate::models::{BatchResult, IterationResult, RunMode, RunSummary};

/// Latency percentiles in milliseconds
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

impl Percentiles {
    /// Calculate percentiles from sorted latencies
    pub fn from_sorted(latencies: &[f64]) -> Self {
        if latencies.is_empty() {
            return Self::default();
        }

        Self {
            p50: percentile(latencies, 50.0),
            p90: percentile(latencies, 90.0),
            p95: percentile(latencies, 95.0),
            p99: percentile(latencies, 99.0),
        }
    }
}

/// Linear interpolation between the two closest ranks
fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        len => {
            let idx = (p / 100.0) * (len - 1) as f64;
            let lower = idx.floor() as usize;
            let upper = (idx.ceil() as usize).min(len - 1);
            let fraction = idx - lower as f64;
            sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction
        }
    }
}

/// Latency statistics in milliseconds
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub percentiles: Percentiles,
    pub count: usize,
}

impl LatencyStats {
    /// Calculate statistics from latency samples in milliseconds
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;

        Self {
            min: sorted[0],
            max: sorted[count - 1],
            mean,
            std_dev: variance.sqrt(),
            percentiles: Percentiles::from_sorted(&sorted),
            count,
        }
    }

    pub fn format_summary(&self) -> String {
        format!(
            "min={:.2}ms max={:.2}ms mean={:.2}ms std={:.2}ms p50={:.2}ms p95={:.2}ms p99={:.2}ms",
            self.min,
            self.max,
            self.mean,
            self.std_dev,
            self.percentiles.p50,
            self.percentiles.p95,
            self.percentiles.p99
        )
    }
}

/// Transport failures that caused an iteration or chunk to be skipped
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorStats {
    pub timeout_errors: usize,
    pub connection_errors: usize,
    pub other_errors: usize,
}

impl ErrorStats {
    pub fn total(&self) -> usize {
        self.timeout_errors + self.connection_errors + self.other_errors
    }

    pub fn record(&mut self, error: &HttpError) {
        match error {
            HttpError::Timeout(_) => self.timeout_errors += 1,
            HttpError::ConnectionRefused(_) => self.connection_errors += 1,
            _ => self.other_errors += 1,
        }
    }
}

/// Running tally for one benchmark run
#[derive(Debug)]
pub struct MetricsCollector {
    mode: RunMode,
    attempted: usize,
    successful: usize,
    matched: usize,
    latencies_ms: Vec<f64>,
    errors: ErrorStats,
}

impl MetricsCollector {
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            attempted: 0,
            successful: 0,
            matched: 0,
            latencies_ms: Vec::new(),
            errors: ErrorStats::default(),
        }
    }

    pub fn record_iteration(&mut self, result: &IterationResult) {
        self.attempted += 1;
        if result.success {
            self.successful += 1;
        }
        if result.matched {
            self.matched += 1;
        }
        self.latencies_ms.push(result.time_s * 1000.0);
    }

    pub fn record_batch(&mut self, result: &BatchResult) {
        self.attempted += result.size();
        self.successful += result.successful_items();
        self.matched += result.matched_count;
        self.latencies_ms.push(result.time_s * 1000.0);
    }

    pub fn record_error(&mut self, error: &HttpError) {
        self.errors.record(error);
    }

    pub fn attempted(&self) -> usize {
        self.attempted
    }

    /// Close the tally with the run's wall-clock time
    pub fn finish(self, total_time: Duration) -> RunSummary {
        RunSummary {
            mode: self.mode,
            attempted: self.attempted,
            successful: self.successful,
            matched: self.matched,
            total_time_s: total_time.as_secs_f64(),
            latency: LatencyStats::from_samples(&self.latencies_ms),
            errors: self.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ApiResponse;

    #[test]
    fn test_percentiles() {
        let data: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        let p = Percentiles::from_sorted(&data);

        assert!((p.p50 - 50.0).abs() < 1.0);
        assert!((p.p90 - 90.0).abs() < 1.0);
        assert!((p.p95 - 95.0).abs() < 1.0);
        assert!((p.p99 - 99.0).abs() < 1.0);
    }

    #[test]
    fn test_latency_stats() {
        let stats = LatencyStats::from_samples(&[5.0, 1.0, 3.0, 2.0, 4.0]);

        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.count, 5);
        assert_eq!(stats.percentiles.p50, 3.0);
    }

    #[test]
    fn test_latency_stats_empty() {
        assert_eq!(LatencyStats::from_samples(&[]), LatencyStats::default());
    }

    #[test]
    fn test_error_stats() {
        let mut errors = ErrorStats::default();
        errors.record(&HttpError::Timeout(10));
        errors.record(&HttpError::ConnectionRefused("http://x".into()));
        errors.record(&HttpError::RequestFailed("reset".into()));

        assert_eq!(errors.timeout_errors, 1);
        assert_eq!(errors.connection_errors, 1);
        assert_eq!(errors.other_errors, 1);
        assert_eq!(errors.total(), 3);
    }

    #[test]
    fn test_collector_single_mode() {
        let ok = ApiResponse::from_text(200, r#"{"protected_data": "t", "data": "1"}"#);
        let denied = ApiResponse::from_text(401, "");

        let mut collector = MetricsCollector::new(RunMode::Single);
        collector.record_iteration(&IterationResult::new("1", ok.clone(), ok.clone(), 0.002));
        collector.record_iteration(&IterationResult::new("2", ok, denied, 0.004));
        collector.record_error(&HttpError::Timeout(10));

        let summary = collector.finish(Duration::from_millis(10));
        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.successful, 1);
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.errors.total(), 1);
        assert_eq!(summary.latency.count, 2);
    }
}
