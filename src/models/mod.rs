//! Data models for round-trip benchmarking
//!
//! Per-iteration results and the run-level summary built from them.

mod round_trip;
mod summary;

pub use round_trip::{BatchResult, IterationResult};
pub use summary::{RunMode, RunReport, RunSummary};
