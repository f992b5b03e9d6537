//! Validation report export

use crate::result::ParsedImportResult;
use crate::violation::ValidationError;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Full report, one line per finding: errors first, then warnings.
/// Never truncated.
pub fn error_report(result: &ParsedImportResult) -> String {
    let mut report = String::new();
    for finding in result.errors.iter().chain(&result.warnings) {
        report.push_str(&finding.to_string());
        report.push('\n');
    }
    report
}

/// Write the full report to a text file
pub fn write_error_report<P: AsRef<Path>>(path: P, result: &ParsedImportResult) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, error_report(result))
        .with_context(|| format!("Failed to write error report: {}", path.display()))
}

/// Lines for interactive display, capped at `limit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub lines: Vec<String>,
    /// Findings not shown
    pub remaining: usize,
}

impl Preview {
    pub fn new(findings: &[ValidationError], limit: usize) -> Self {
        Self {
            lines: findings.iter().take(limit).map(|f| f.to_string()).collect(),
            remaining: findings.len().saturating_sub(limit),
        }
    }

    /// Note about hidden findings, if any
    pub fn remainder_note(&self) -> Option<String> {
        (self.remaining > 0).then(|| {
            format!(
                "... and {} more (download the full report to see all)",
                self.remaining
            )
        })
    }
}
