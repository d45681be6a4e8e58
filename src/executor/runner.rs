//! Round-trip runner
//!
//! Drives one protect -> reveal pair (or one bulk pair) and times it.

use tracing::debug;

use crate::http::{HttpError, ProtectionApi};
use crate::models::{BatchResult, IterationResult};
use crate::utils::Timer;

/// Runs round trips against a [`ProtectionApi`]
pub struct RoundTripRunner<'a, A: ProtectionApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: ProtectionApi + ?Sized> Clone for RoundTripRunner<'a, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, A: ProtectionApi + ?Sized> Copy for RoundTripRunner<'a, A> {}

impl<'a, A: ProtectionApi + ?Sized> RoundTripRunner<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Protect `data`, reveal the returned token, compare.
    ///
    /// Only transport failures are errors; non-2xx statuses are recorded
    /// in the result.
    pub async fn run_single(&self, data: &str) -> Result<IterationResult, HttpError> {
        let timer = Timer::start("protect/reveal");

        let protect_response = self.api.protect(data).await?;
        let token = protect_response.protected_data();
        let reveal_response = self.api.reveal(&token).await?;

        let result = IterationResult::new(data, protect_response, reveal_response, timer.stop());
        debug!("Round trip {}", result);
        Ok(result)
    }

    /// Bulk-protect the whole chunk, bulk-reveal the returned tokens,
    /// compare position by position.
    pub async fn run_batch(&self, batch: &[String]) -> Result<BatchResult, HttpError> {
        let timer = Timer::start("protectbulk/revealbulk");

        let protect_response = self.api.protect_bulk(batch).await?;
        let tokens = protect_response.protected_data_array();
        let reveal_response = self.api.reveal_bulk(&tokens).await?;

        let result = BatchResult::new(
            batch.to_vec(),
            protect_response,
            reveal_response,
            timer.stop(),
        );
        debug!(
            "Bulk round trip size={} restored={} matched={} time={:.4}s",
            result.size(),
            result.restored_count,
            result.matched_count,
            result.time_s
        );
        Ok(result)
    }
}
