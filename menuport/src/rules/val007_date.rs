//! VAL007: Unrecognized date

use super::ValidationRule;
use crate::normalize::{NormalizedRow, Parsed};
use crate::reader::Column;
use crate::violation::{Severity, ValidationError};

pub struct DateRule;

impl ValidationRule for DateRule {
    fn id(&self) -> &str {
        "VAL007"
    }

    fn name(&self) -> &str {
        "Unrecognized date"
    }

    fn check(&self, rows: &[NormalizedRow]) -> Vec<ValidationError> {
        rows.iter()
            .filter_map(|row| match &row.date {
                Parsed::Invalid(raw) => Some(ValidationError::new(
                    self.id(),
                    row.row,
                    Column::Date.label(),
                    "Date must be a date, 'Daily' or 'Weekly-<Day>'",
                    raw.clone(),
                    Severity::Error,
                )),
                _ => None,
            })
            .collect()
    }
}
