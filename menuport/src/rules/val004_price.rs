//! VAL004: Price is required and must be a non-negative number

use super::ValidationRule;
use crate::normalize::{NormalizedRow, Parsed};
use crate::reader::{CellValue, Column};
use crate::violation::{Severity, ValidationError};

pub struct PriceRule;

impl ValidationRule for PriceRule {
    fn id(&self) -> &str {
        "VAL004"
    }

    fn name(&self) -> &str {
        "Price"
    }

    fn mandatory(&self) -> bool {
        true
    }

    fn check(&self, rows: &[NormalizedRow]) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for row in rows {
            let finding = match &row.price {
                Parsed::Absent => Some(("Price is required".to_string(), CellValue::Empty)),
                Parsed::Invalid(raw) => Some(("Price must be a number".to_string(), raw.clone())),
                Parsed::Valid(price) if *price < 0.0 => Some((
                    "Price must not be negative".to_string(),
                    row.price_cell.clone(),
                )),
                Parsed::Valid(_) => None,
            };

            if let Some((message, value)) = finding {
                errors.push(ValidationError::new(
                    self.id(),
                    row.row,
                    Column::Price.label(),
                    message,
                    value,
                    Severity::Error,
                ));
            }
        }

        errors
    }
}
