//! VAL002: Item name is required

use super::ValidationRule;
use crate::normalize::NormalizedRow;
use crate::reader::{CellValue, Column};
use crate::violation::{Severity, ValidationError};

pub struct RequiredItemNameRule;

impl ValidationRule for RequiredItemNameRule {
    fn id(&self) -> &str {
        "VAL002"
    }

    fn name(&self) -> &str {
        "Required item name"
    }

    fn mandatory(&self) -> bool {
        true
    }

    fn check(&self, rows: &[NormalizedRow]) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for row in rows {
            if row.item_name.is_none() {
                errors.push(ValidationError::new(
                    self.id(),
                    row.row,
                    Column::ItemName.label(),
                    "Item name is required",
                    CellValue::Empty,
                    Severity::Error,
                ));
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_item_name() {
        let mut named = NormalizedRow::empty(2);
        named.item_name = Some("Vada".to_string());

        let errors = RequiredItemNameRule.check(&[named, NormalizedRow::empty(3)]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, 3);
        assert_eq!(errors[0].field, "Item Name");
    }
}
