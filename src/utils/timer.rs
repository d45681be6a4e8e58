//! Timer utilities

use std::time::{Duration, Instant};

/// Measures one labelled span of work
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    label: String,
}

impl Timer {
    /// Create and start a new timer
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            label: label.into(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop timer and return elapsed seconds
    pub fn stop(self) -> f64 {
        let elapsed = self.elapsed();
        tracing::trace!("{}: {:.4}s", self.label, elapsed.as_secs_f64());
        elapsed.as_secs_f64()
    }
}
