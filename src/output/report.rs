//! JSON run reports

use anyhow::{Context, Result};
use std::path::Path;

use crate::models::RunReport;

/// Write `report` as pretty JSON, creating parent directories as needed
pub fn write_report(path: impl AsRef<Path>, report: &RunReport) -> Result<()> {
    let path = path.as_ref();
    let content = serde_json::to_string_pretty(report).context("Failed to serialize report")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report: {}", path.display()))
}
