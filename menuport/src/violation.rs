//! Row/field level validation findings

use crate::reader::CellValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Severity level of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// A problem found in one field of one source row.
///
/// Errors block the import; warnings are reported but never exclude a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Rule ID (e.g., "VAL004")
    pub rule_id: String,
    /// 1-based sheet row, header is row 1
    pub row: usize,
    /// Column label the finding refers to
    pub field: String,
    /// Human-readable message
    pub message: String,
    /// Original cell value
    pub value: CellValue,
    pub severity: Severity,
}

impl ValidationError {
    pub fn new(
        rule_id: impl Into<String>,
        row: usize,
        field: impl Into<String>,
        message: impl Into<String>,
        value: CellValue,
        severity: Severity,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            row,
            field: field.into(),
            message: message.into(),
            value,
            severity,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.value.is_empty() {
            "empty".to_string()
        } else {
            self.value.to_string()
        };
        write!(
            f,
            "Row {}, Field {}: {} (Value: {})",
            self.row, self.field, self.message, value
        )
    }
}

impl Eq for ValidationError {}

impl PartialOrd for ValidationError {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ValidationError {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row
            .cmp(&other.row)
            .then_with(|| self.rule_id.cmp(&other.rule_id))
            .then_with(|| self.field.cmp(&other.field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_report_line() {
        let err = ValidationError::new(
            "VAL004",
            4,
            "Price",
            "Price must be a number",
            CellValue::Text("abc".to_string()),
            Severity::Error,
        );
        assert_eq!(
            err.to_string(),
            "Row 4, Field Price: Price must be a number (Value: abc)"
        );
    }

    #[test]
    fn test_display_empty_value() {
        let err = ValidationError::new(
            "VAL001",
            2,
            "Category",
            "Category is required",
            CellValue::Empty,
            Severity::Error,
        );
        assert!(err.to_string().ends_with("(Value: empty)"));
    }

    #[test]
    fn test_ordering_by_row() {
        let a = ValidationError::new("VAL004", 3, "Price", "x", CellValue::Empty, Severity::Error);
        let b = ValidationError::new(
            "VAL001",
            7,
            "Category",
            "y",
            CellValue::Empty,
            Severity::Error,
        );
        let mut v = vec![b.clone(), a.clone()];
        v.sort();
        assert_eq!(v, vec![a, b]);
    }
}
