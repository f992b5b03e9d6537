//! Output of the parsing step

use crate::categories::CategorySpec;
use crate::normalize::{MenuDate, NormalizedRow, SpiceLevel};
use crate::violation::ValidationError;
use serde::Serialize;
use std::collections::BTreeSet;

/// A row that passed validation, with every mandatory field present
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItemRecord {
    /// 1-based sheet row, header is row 1
    pub row: usize,
    pub date: Option<MenuDate>,
    pub meal_type: Option<String>,
    pub category_name: String,
    pub item_name: String,
    pub price: f64,
    pub half_price: Option<f64>,
    pub description: Option<String>,
    pub spice_level: Option<SpiceLevel>,
    pub dietary_tags: BTreeSet<String>,
}

impl MenuItemRecord {
    pub fn new(row: usize, category: &str, name: &str, price: f64) -> Self {
        Self {
            row,
            date: None,
            meal_type: None,
            category_name: category.to_string(),
            item_name: name.to_string(),
            price,
            half_price: None,
            description: None,
            spice_level: None,
            dietary_tags: BTreeSet::new(),
        }
    }

    /// Project a normalized row; `None` if a mandatory field is missing.
    /// Optional fields that failed to parse are dropped.
    pub fn from_row(row: &NormalizedRow) -> Option<Self> {
        Some(Self {
            row: row.row,
            date: row.date.valid().copied(),
            meal_type: row.meal_type.clone(),
            category_name: row.category_name.clone()?,
            item_name: row.item_name.clone()?,
            price: *row.price.valid()?,
            half_price: row.half_price.valid().copied(),
            description: row.description.clone(),
            spice_level: row.spice_level.valid().copied(),
            dietary_tags: row.dietary_tags.clone(),
        })
    }
}

/// Everything the preview needs, held until import or abort
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedImportResult {
    pub categories: Vec<CategorySpec>,
    pub menu_items: Vec<MenuItemRecord>,
    /// Blocking findings
    pub errors: Vec<ValidationError>,
    /// Non-blocking findings
    pub warnings: Vec<ValidationError>,
    /// Data rows read from the file (blank rows excluded)
    pub total_rows: usize,
}

impl ParsedImportResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether the "confirm import" action is available
    pub fn can_confirm(&self) -> bool {
        self.errors.is_empty() && !self.menu_items.is_empty()
    }
}
