//! Output formatters for run results
//!
//! Progress lines for each completed round trip and the end-of-run summary
//! in text or JSON.

use tracing::warn;

use crate::models::{BatchResult, IterationResult, RunMode, RunSummary};

/// Summary output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            _ => None,
        }
    }
}

/// Progress line for a single-mode iteration (1-based `number`)
pub fn format_iteration_progress(number: usize, result: &IterationResult) -> String {
    format!("#{number:03} {result}")
}

/// Progress line for a bulk-mode chunk (1-based `number`)
pub fn format_batch_progress(number: usize, result: &BatchResult) -> String {
    format!(
        "Batch #{:03} size={} time={:.4}s protect_status={} reveal_status={} matched={}",
        number,
        result.size(),
        result.time_s,
        result.protect_response.status_code,
        result.reveal_response.status_code,
        result.matched_count
    )
}

/// Summary formatter
pub struct SummaryFormatter {
    format: OutputFormat,
}

fn render_json(rendered: serde_json::Result<String>) -> String {
    rendered.unwrap_or_else(|e| {
        warn!("Failed to serialize summary: {}", e);
        String::new()
    })
}

impl SummaryFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_summary(&self, summary: &RunSummary) -> String {
        match self.format {
            OutputFormat::Text => self.format_summary_text(summary),
            OutputFormat::Json => render_json(serde_json::to_string(summary)),
            OutputFormat::JsonPretty => render_json(serde_json::to_string_pretty(summary)),
        }
    }

    fn format_summary_text(&self, summary: &RunSummary) -> String {
        let unit = summary.mode.unit();
        let (attempted_label, sample_unit) = match summary.mode {
            RunMode::Single => ("Iterations", "iteration"),
            RunMode::Bulk => ("Items", "batch"),
        };

        let mut output = String::from("\nSummary\n");
        output.push_str(&format!(
            "- {attempted_label} attempted: {}\n",
            summary.attempted
        ));
        output.push_str(&format!(
            "- Successful (both 2xx): {}\n",
            summary.successful
        ));
        output.push_str(&format!(
            "- Revealed matched original data: {}\n",
            summary.matched
        ));
        output.push_str(&format!("- Total time: {:.4}s\n", summary.total_time_s));

        if let Some(average) = summary.average_time_s() {
            output.push_str(&format!("- Average per-{unit} time: {average:.4}s\n"));
        }
        if summary.latency.count > 0 {
            output.push_str(&format!(
                "- Latency per {sample_unit}: {}\n",
                summary.latency.format_summary()
            ));
        }

        let errors = &summary.errors;
        if errors.total() > 0 {
            output.push_str(&format!(
                "- Transport errors (skipped): {} (timeout={}, connection={}, other={})\n",
                errors.total(),
                errors.timeout_errors,
                errors.connection_errors,
                errors.other_errors
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::{ErrorStats, LatencyStats};
    use crate::http::ApiResponse;

    fn summary(mode: RunMode) -> RunSummary {
        RunSummary {
            mode,
            attempted: 2,
            successful: 2,
            matched: 1,
            total_time_s: 0.5,
            latency: LatencyStats::default(),
            errors: ErrorStats::default(),
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("csv"), None);
    }

    #[test]
    fn test_iteration_progress_line() {
        let result = IterationResult::new(
            "99",
            ApiResponse::from_text(200, r#"{"protected_data": "t"}"#),
            ApiResponse::from_text(200, r#"{"data": "99"}"#),
            0.01234,
        );
        assert_eq!(
            format_iteration_progress(1, &result),
            "#001 data=99 time=0.0123s protect_status=200 reveal_status=200 match=true"
        );
    }

    #[test]
    fn test_batch_progress_line() {
        let result = BatchResult::new(
            vec!["1".to_string(), "2".to_string()],
            ApiResponse::from_text(200, "{}"),
            ApiResponse::from_text(502, "bad gateway"),
            0.5,
        );
        assert_eq!(
            format_batch_progress(12, &result),
            "Batch #012 size=2 time=0.5000s protect_status=200 reveal_status=502 matched=0"
        );
    }

    #[test]
    fn test_text_summary() {
        let text =
            SummaryFormatter::new(OutputFormat::Text).format_summary(&summary(RunMode::Single));
        assert!(text.starts_with("\nSummary\n"));
        assert!(text.contains("- Iterations attempted: 2\n"));
        assert!(text.contains("- Successful (both 2xx): 2\n"));
        assert!(text.contains("- Revealed matched original data: 1\n"));
        assert!(text.contains("- Total time: 0.5000s\n"));
        assert!(text.contains("- Average per-iteration time: 0.2500s\n"));
        assert!(!text.contains("Transport errors"));
    }

    #[test]
    fn test_bulk_summary_reports_per_item() {
        let mut bulk = summary(RunMode::Bulk);
        bulk.errors.timeout_errors = 1;

        let text = SummaryFormatter::new(OutputFormat::Text).format_summary(&bulk);
        assert!(text.contains("- Items attempted: 2\n"));
        assert!(text.contains("- Average per-item time: 0.2500s\n"));
        assert!(
            text.contains("- Transport errors (skipped): 1 (timeout=1, connection=0, other=0)\n")
        );
    }

    #[test]
    fn test_json_summary() {
        let json =
            SummaryFormatter::new(OutputFormat::Json).format_summary(&summary(RunMode::Bulk));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["mode"], "bulk");
        assert_eq!(value["attempted"], 2);
    }

    #[test]
    fn test_render_json_falls_back_to_empty() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        assert_eq!(render_json(Err(err)), "");
        assert_eq!(render_json(Ok("{}".to_string())), "{}");
    }
}
