//! Benchmark driver
//!
//! Generates the test values, feeds them through the round-trip runner one
//! iteration (or chunk) at a time, and tallies the outcomes. With more than
//! one worker, up to `workers` round trips are in flight at once but their
//! results are still consumed in input order.

use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, info};

use super::runner::RoundTripRunner;
use super::sequence::generate_sequence;
use crate::benchmark::MetricsCollector;
use crate::config::Settings;
use crate::http::ProtectionApi;
use crate::models::{RunMode, RunSummary};
use crate::output::{format_batch_progress, format_iteration_progress};

/// Runs a whole benchmark against one service
pub struct Driver<'a, A: ProtectionApi + ?Sized> {
    runner: RoundTripRunner<'a, A>,
    settings: &'a Settings,
}

impl<'a, A: ProtectionApi + ?Sized> Driver<'a, A> {
    pub fn new(api: &'a A, settings: &'a Settings) -> Self {
        Self {
            runner: RoundTripRunner::new(api),
            settings,
        }
    }

    fn workers(&self) -> usize {
        self.settings.workers.max(1)
    }

    /// Run every iteration or chunk and summarize. Transport failures skip
    /// the affected iteration or chunk and never end the run.
    pub async fn run(&self) -> RunSummary {
        let mode = RunMode::from_bulk(self.settings.bulk);
        let inputs = generate_sequence(&self.settings.start_data, self.settings.iterations);

        info!(
            "Running {} {} round trip(s) starting at {} with {} worker(s)",
            inputs.len(),
            mode,
            self.settings.start_data,
            self.workers()
        );

        let start = Instant::now();
        let mut collector = MetricsCollector::new(mode);

        match mode {
            RunMode::Single => self.run_iterations(&inputs, &mut collector).await,
            RunMode::Bulk => self.run_batches(&inputs, &mut collector).await,
        }

        collector.finish(start.elapsed())
    }

    async fn run_iterations(&self, inputs: &[String], collector: &mut MetricsCollector) {
        let runner = self.runner;
        let mut outcomes = std::pin::pin!(stream::iter(inputs.iter().enumerate())
            .map(move |(idx, data)| async move { (idx + 1, runner.run_single(data).await) })
            .buffered(self.workers()));

        while let Some((number, outcome)) = outcomes.next().await {
            match outcome {
                Ok(result) => {
                    collector.record_iteration(&result);

                    if self.settings.show_progress {
                        eprintln!("{}", format_iteration_progress(number, &result));
                        if self.settings.show_body {
                            eprintln!();
                        }
                    }
                }
                Err(e) => {
                    debug!("Error at iteration {}: {}", number, e);
                    collector.record_error(&e);
                }
            }
        }
    }

    async fn run_batches(&self, inputs: &[String], collector: &mut MetricsCollector) {
        let runner = self.runner;
        let batch_size = self.settings.batch_size.max(1);
        let mut outcomes = std::pin::pin!(stream::iter(inputs.chunks(batch_size).enumerate())
            .map(move |(idx, batch)| async move { (idx + 1, runner.run_batch(batch).await) })
            .buffered(self.workers()));

        while let Some((number, outcome)) = outcomes.next().await {
            match outcome {
                Ok(result) => {
                    collector.record_batch(&result);

                    if self.settings.show_progress {
                        eprintln!("{}", format_batch_progress(number, &result));
                    }
                }
                Err(e) => {
                    debug!("Error at batch {}: {}", number, e);
                    collector.record_error(&e);
                }
            }
        }

        debug!("Processed {} item(s) in bulk mode", collector.attempted());
    }
}

#[cfg(test)]
mod tests {
    use super::super::runner::stub::StubService;
    use super::*;

    fn settings(start_data: &str, iterations: usize) -> Settings {
        Settings {
            start_data: start_data.to_string(),
            iterations,
            ..Settings::default()
        }
    }

    fn bulk_settings(start_data: &str, iterations: usize, batch_size: usize) -> Settings {
        Settings {
            bulk: true,
            batch_size,
            ..settings(start_data, iterations)
        }
    }

    #[tokio::test]
    async fn test_sequential_round_trips() {
        let service = StubService::default();
        let settings = settings("99", 2);

        let summary = Driver::new(&service, &settings).run().await;
        assert_eq!(summary.mode, RunMode::Single);
        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.matched, 2);
        assert_eq!(summary.errors.total(), 0);

        let calls = service.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec!["protect 99", "reveal tok-99", "protect 100", "reveal tok-001"]
        );
    }

    #[tokio::test]
    async fn test_non_numeric_start_runs_once() {
        let service = StubService::default();
        let settings = settings("abc", 5);

        let summary = Driver::new(&service, &settings).run().await;
        assert_eq!(summary.attempted, 1);
        assert_eq!(summary.matched, 1);
    }

    #[tokio::test]
    async fn test_transport_error_skips_iteration() {
        let service = StubService {
            unreachable: ["100".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let settings = settings("99", 3);

        let summary = Driver::new(&service, &settings).run().await;
        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.errors.connection_errors, 1);
    }

    #[tokio::test]
    async fn test_non_2xx_counts_but_continues() {
        let service = StubService {
            reveal_status: Some(503),
            ..Default::default()
        };
        let settings = settings("1", 3);

        let summary = Driver::new(&service, &settings).run().await;
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.successful, 0);
        assert_eq!(summary.errors.total(), 0);
    }

    #[tokio::test]
    async fn test_batch_partitioning() {
        let service = StubService::default();
        let settings = bulk_settings("1", 5, 2);

        let summary = Driver::new(&service, &settings).run().await;
        assert_eq!(*service.bulk_sizes.lock().unwrap(), vec![2, 2, 1]);
        assert_eq!(summary.mode, RunMode::Bulk);
        assert_eq!(summary.attempted, 5);
        assert_eq!(summary.successful, 5);
        assert_eq!(summary.matched, 5);
        assert_eq!(summary.latency.count, 3);
    }

    #[tokio::test]
    async fn test_batch_exact_multiple() {
        let service = StubService::default();
        let settings = bulk_settings("1", 6, 3);

        Driver::new(&service, &settings).run().await;
        assert_eq!(*service.bulk_sizes.lock().unwrap(), vec![3, 3]);
    }

    #[tokio::test]
    async fn test_batch_partial_reveal_credits_restored() {
        let service = StubService {
            drop_last: true,
            ..Default::default()
        };
        let settings = bulk_settings("1", 5, 2);

        let summary = Driver::new(&service, &settings).run().await;
        assert_eq!(summary.attempted, 5);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.matched, 2);
    }

    #[tokio::test]
    async fn test_batch_transport_error_skips_chunk() {
        let service = StubService {
            unreachable: ["3".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let settings = bulk_settings("1", 5, 2);

        let summary = Driver::new(&service, &settings).run().await;
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.matched, 3);
        assert_eq!(summary.errors.timeout_errors, 1);
    }

    #[tokio::test]
    async fn test_concurrent_workers_cover_every_value() {
        let service = StubService::default();
        let settings = Settings {
            workers: 4,
            ..settings("1000", 10)
        };

        let summary = Driver::new(&service, &settings).run().await;
        assert_eq!(summary.attempted, 10);
        assert_eq!(summary.matched, 10);

        let calls = service.calls.lock().unwrap();
        let protected = calls.iter().filter(|c| c.starts_with("protect ")).count();
        assert_eq!(protected, 10);
    }

    #[test]
    fn test_zero_iterations() {
        let service = StubService::default();
        let settings = settings("1", 0);

        let summary = tokio_test::block_on(Driver::new(&service, &settings).run());
        assert_eq!(summary.attempted, 0);
        assert_eq!(summary.average_time_s(), None);
    }
}
