//! VAL005: Half price, when given, must be a non-negative number

use super::ValidationRule;
use crate::normalize::{NormalizedRow, Parsed};
use crate::reader::Column;
use crate::violation::{Severity, ValidationError};

pub struct HalfPriceRule;

impl ValidationRule for HalfPriceRule {
    fn id(&self) -> &str {
        "VAL005"
    }

    fn name(&self) -> &str {
        "Half price"
    }

    fn mandatory(&self) -> bool {
        true
    }

    fn check(&self, rows: &[NormalizedRow]) -> Vec<ValidationError> {
        rows.iter()
            .filter_map(|row| {
                let (message, value) = match &row.half_price {
                    Parsed::Invalid(raw) => ("Half price must be a number", raw.clone()),
                    Parsed::Valid(half) if *half < 0.0 => {
                        ("Half price must not be negative", row.half_price_cell.clone())
                    }
                    _ => return None,
                };
                Some(ValidationError::new(
                    self.id(),
                    row.row,
                    Column::HalfPrice.label(),
                    message,
                    value,
                    Severity::Error,
                ))
            })
            .collect()
    }
}
