//! VAL008: Unrecognized spice level

use super::ValidationRule;
use crate::normalize::{NormalizedRow, Parsed};
use crate::reader::Column;
use crate::violation::{Severity, ValidationError};

pub struct SpiceLevelRule;

impl ValidationRule for SpiceLevelRule {
    fn id(&self) -> &str {
        "VAL008"
    }

    fn name(&self) -> &str {
        "Unrecognized spice level"
    }

    fn check(&self, rows: &[NormalizedRow]) -> Vec<ValidationError> {
        rows.iter()
            .filter_map(|row| match &row.spice_level {
                Parsed::Invalid(raw) => Some(ValidationError::new(
                    self.id(),
                    row.row,
                    Column::SpiceLevel.label(),
                    "Unknown spice level, expected Mild, Medium, Hot or Extra Hot; it will be left blank",
                    raw.clone(),
                    Severity::Warning,
                )),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::CellValue;

    #[test]
    fn test_unknown_spice_level_is_warning() {
        let mut row = NormalizedRow::empty(2);
        row.spice_level = Parsed::Invalid(CellValue::Text("lava".to_string()));

        let findings = SpiceLevelRule.check(&[row]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
    }
}
