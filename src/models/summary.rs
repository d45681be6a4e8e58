//! Run summary and report models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::benchmark::{ErrorStats, LatencyStats};

/// Which endpoints a run exercises
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// `/v1/protect` + `/v1/reveal`, one value per iteration
    Single,
    /// `/v1/protectbulk` + `/v1/revealbulk`, one chunk per iteration
    Bulk,
}

impl RunMode {
    pub fn from_bulk(bulk: bool) -> Self {
        if bulk {
            RunMode::Bulk
        } else {
            RunMode::Single
        }
    }

    /// Unit the average time is reported per
    pub fn unit(&self) -> &'static str {
        match self {
            RunMode::Single => "iteration",
            RunMode::Bulk => "item",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Single => write!(f, "single"),
            RunMode::Bulk => write!(f, "bulk"),
        }
    }
}

/// Aggregated counters of one run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub mode: RunMode,
    /// Iterations (single) or items (bulk) whose round trip completed
    pub attempted: usize,
    /// Both calls answered 2xx
    pub successful: usize,
    /// Revealed value equals the original
    pub matched: usize,
    pub total_time_s: f64,
    pub latency: LatencyStats,
    pub errors: ErrorStats,
}

impl RunSummary {
    /// Wall-clock time divided by completed iterations or items
    pub fn average_time_s(&self) -> Option<f64> {
        (self.attempted > 0).then(|| self.total_time_s / self.attempted as f64)
    }
}

/// Report written to `output.file`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub target: String,
    pub policy: String,
    pub start_data: String,
    pub iterations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
    pub workers: usize,
    pub summary: RunSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_time_s: Option<f64>,
}
