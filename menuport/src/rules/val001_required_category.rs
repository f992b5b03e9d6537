//! VAL001: Category is required

use super::ValidationRule;
use crate::normalize::NormalizedRow;
use crate::reader::{CellValue, Column};
use crate::violation::{Severity, ValidationError};

pub struct RequiredCategoryRule;

impl ValidationRule for RequiredCategoryRule {
    fn id(&self) -> &str {
        "VAL001"
    }

    fn name(&self) -> &str {
        "Required category"
    }

    fn mandatory(&self) -> bool {
        true
    }

    fn check(&self, rows: &[NormalizedRow]) -> Vec<ValidationError> {
        rows.iter()
            .filter(|row| row.category_name.is_none())
            .map(|row| {
                ValidationError::new(
                    self.id(),
                    row.row,
                    Column::Category.label(),
                    "Category is required",
                    CellValue::Empty,
                    Severity::Error,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_category() {
        let mut ok = NormalizedRow::empty(2);
        ok.category_name = Some("Snacks".to_string());
        let missing = NormalizedRow::empty(3);

        let errors = RequiredCategoryRule.check(&[ok, missing]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, 3);
        assert_eq!(errors[0].field, "Category");
        assert_eq!(errors[0].rule_id, "VAL001");
    }
}
