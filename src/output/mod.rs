//! Output formatting module
//!
//! Progress lines, run summaries and JSON reports.

mod formatter;
mod report;

pub use formatter::{
    format_batch_progress, format_iteration_progress, OutputFormat, SummaryFormatter,
};
pub use report::write_report;
