//! Benchmark metrics module
//!
//! Latency statistics and the run tally behind the summary.

mod metrics;

pub use metrics::{ErrorStats, LatencyStats, MetricsCollector};
