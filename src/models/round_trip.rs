//! Round-trip result models
//!
//! One value per protect/reveal pair (single mode) or per chunk (bulk mode).

use serde::Serialize;
use std::fmt;

use crate::http::ApiResponse;

/// Outcome of one protect -> reveal round trip
#[derive(Clone, Debug, Serialize)]
pub struct IterationResult {
    pub data: String,
    pub protect_response: ApiResponse,
    pub reveal_response: ApiResponse,
    pub protected_token: String,
    pub restored: String,
    pub time_s: f64,
    /// Both responses were 2xx
    pub success: bool,
    /// The restored value equals the input byte for byte
    pub matched: bool,
}

impl IterationResult {
    pub fn new(
        data: impl Into<String>,
        protect_response: ApiResponse,
        reveal_response: ApiResponse,
        time_s: f64,
    ) -> Self {
        let data = data.into();
        let protected_token = protect_response.protected_data();
        let restored = reveal_response.data();
        let success = protect_response.is_success() && reveal_response.is_success();
        let matched = restored == data;

        Self {
            data,
            protect_response,
            reveal_response,
            protected_token,
            restored,
            time_s,
            success,
            matched,
        }
    }
}

impl fmt::Display for IterationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "data={} time={:.4}s protect_status={} reveal_status={} match={}",
            self.data,
            self.time_s,
            self.protect_response.status_code,
            self.reveal_response.status_code,
            self.matched
        )
    }
}

/// Outcome of one bulk protect -> bulk reveal round trip
#[derive(Clone, Debug, Serialize)]
pub struct BatchResult {
    pub data: Vec<String>,
    pub protect_response: ApiResponse,
    pub reveal_response: ApiResponse,
    pub protected_tokens: Vec<String>,
    pub restored: Vec<String>,
    pub time_s: f64,
    /// Both responses were 2xx
    pub success: bool,
    /// Same length as the input and equal at every position
    pub matched: bool,
    pub restored_count: usize,
    /// Position-wise equal pairs over the common prefix
    pub matched_count: usize,
}

impl BatchResult {
    pub fn new(
        data: Vec<String>,
        protect_response: ApiResponse,
        reveal_response: ApiResponse,
        time_s: f64,
    ) -> Self {
        let protected_tokens = protect_response.protected_data_array();
        let restored = reveal_response.data_array();
        let success = protect_response.is_success() && reveal_response.is_success();

        // No re-alignment: a dropped or reordered entry counts as a mismatch
        // from that position on.
        let matched_count = data
            .iter()
            .zip(&restored)
            .filter(|(original, restored)| original == restored)
            .count();
        let matched = restored.len() == data.len() && matched_count == data.len();

        Self {
            restored_count: restored.len(),
            data,
            protect_response,
            reveal_response,
            protected_tokens,
            restored,
            time_s,
            success,
            matched,
            matched_count,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Items credited as successful: the whole chunk when every value came
    /// back, otherwise only the restored ones.
    ///
    /// Capped at the chunk size, so a response carrying more values than
    /// were sent never credits more items than were attempted.
    pub fn successful_items(&self) -> usize {
        if !self.success {
            return 0;
        }
        self.restored_count.min(self.size())
    }
}
