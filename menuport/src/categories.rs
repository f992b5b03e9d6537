//! Category resolver: deduplicates category names in first-seen order

use crate::config::CategoryMatching;
use crate::result::MenuItemRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A category to be resolved or created when the import is confirmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub name: String,
    /// Position of first appearance in the file, starting at 0
    pub display_order: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryResolver {
    matching: CategoryMatching,
}

impl CategoryResolver {
    pub fn new(matching: CategoryMatching) -> Self {
        Self { matching }
    }

    pub fn matching(&self) -> CategoryMatching {
        self.matching
    }

    /// Comparison key for a category name under the configured policy
    pub fn key(&self, name: &str) -> String {
        self.matching.key(name)
    }

    /// Distinct categories referenced by `items`. The first spelling seen
    /// wins when matching is case-insensitive.
    pub fn resolve(&self, items: &[MenuItemRecord]) -> Vec<CategorySpec> {
        let mut seen = HashSet::new();
        let mut categories = Vec::new();

        for item in items {
            if seen.insert(self.key(&item.category_name)) {
                categories.push(CategorySpec {
                    name: item.category_name.trim().to_string(),
                    display_order: categories.len() as u32,
                });
            }
        }

        categories
    }
}
