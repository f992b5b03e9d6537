//! VAL003: Duplicate (category, item) pairs within one import

use super::ValidationRule;
use crate::config::{CategoryMatching, ImportConfig};
use crate::normalize::NormalizedRow;
use crate::reader::{CellValue, Column};
use crate::violation::{Severity, ValidationError};
use std::collections::HashMap;

pub struct DuplicateItemsRule {
    matching: CategoryMatching,
}

impl DuplicateItemsRule {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            matching: config.validation.category_matching,
        }
    }
}

impl Default for DuplicateItemsRule {
    fn default() -> Self {
        Self {
            matching: CategoryMatching::default(),
        }
    }
}

impl ValidationRule for DuplicateItemsRule {
    fn id(&self) -> &str {
        "VAL003"
    }

    fn name(&self) -> &str {
        "Duplicate items"
    }

    fn mandatory(&self) -> bool {
        true
    }

    fn check(&self, rows: &[NormalizedRow]) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        // (category key, item name) -> first row seen
        let mut seen: HashMap<(String, String), usize> = HashMap::new();

        for row in rows {
            let (Some(category), Some(item)) = (&row.category_name, &row.item_name) else {
                continue;
            };
            let key = (self.matching.key(category), item.clone());

            match seen.get(&key) {
                Some(first_row) => errors.push(ValidationError::new(
                    self.id(),
                    row.row,
                    Column::ItemName.label(),
                    format!(
                        "Duplicate item '{}' in category '{}' (first seen on row {})",
                        item, category, first_row
                    ),
                    CellValue::Text(item.clone()),
                    Severity::Error,
                )),
                None => {
                    seen.insert(key, row.row);
                }
            }
        }

        errors
    }
}
