//! VAL006: Half price above the full price

use super::ValidationRule;
use crate::config::{HalfPriceCheck, ImportConfig};
use crate::normalize::NormalizedRow;
use crate::reader::Column;
use crate::violation::{Severity, ValidationError};

pub struct HalfPriceExceedsPriceRule {
    severity: Severity,
}

impl HalfPriceExceedsPriceRule {
    /// `None` when the check is switched off in the configuration
    pub fn new(config: &ImportConfig) -> Option<Self> {
        let severity = match config.validation.half_price_check {
            HalfPriceCheck::Off => return None,
            HalfPriceCheck::Warning => Severity::Warning,
            HalfPriceCheck::Error => Severity::Error,
        };
        Some(Self { severity })
    }
}

impl Default for HalfPriceExceedsPriceRule {
    fn default() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }
}

impl ValidationRule for HalfPriceExceedsPriceRule {
    fn id(&self) -> &str {
        "VAL006"
    }

    fn name(&self) -> &str {
        "Half price exceeds price"
    }

    fn check(&self, rows: &[NormalizedRow]) -> Vec<ValidationError> {
        let mut findings = Vec::new();

        for row in rows {
            let (Some(price), Some(half)) = (row.price.valid(), row.half_price.valid()) else {
                continue;
            };
            if half > price {
                findings.push(ValidationError::new(
                    self.id(),
                    row.row,
                    Column::HalfPrice.label(),
                    format!("Half price {} is higher than price {}", half, price),
                    row.half_price_cell.clone(),
                    self.severity,
                ));
            }
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Parsed;
    use crate::reader::CellValue;

    fn row(index: usize, price: f64, half: f64) -> NormalizedRow {
        let mut row = NormalizedRow::empty(index);
        row.price = Parsed::Valid(price);
        row.half_price = Parsed::Valid(half);
        row.half_price_cell = CellValue::Number(half);
        row
    }

    #[test]
    fn test_half_price_above_price() {
        let rows = vec![row(2, 100.0, 60.0), row(3, 100.0, 120.0), row(4, 80.0, 80.0)];

        let findings = HalfPriceExceedsPriceRule::default().check(&rows);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].row, 3);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[0].value, CellValue::Number(120.0));
    }

    #[test]
    fn test_configured_severity() {
        let mut config = ImportConfig::default();
        config.validation.half_price_check = HalfPriceCheck::Error;
        let rule = HalfPriceExceedsPriceRule::new(&config).unwrap();
        let findings = rule.check(&[row(2, 10.0, 20.0)]);
        assert_eq!(findings[0].severity, Severity::Error);

        config.validation.half_price_check = HalfPriceCheck::Off;
        assert!(HalfPriceExceedsPriceRule::new(&config).is_none());
    }
}
