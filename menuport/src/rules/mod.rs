//! Row validation rule system

pub mod registry;

// Rule implementations
pub mod val001_required_category;
pub mod val002_required_item_name;
pub mod val003_duplicate_items;
pub mod val004_price;
pub mod val005_half_price;
pub mod val006_half_price_exceeds_price;
pub mod val007_date;
pub mod val008_spice_level;

use crate::normalize::NormalizedRow;
use crate::violation::ValidationError;

/// Trait that all validation rules must implement
pub trait ValidationRule: Send + Sync {
    /// Unique rule identifier (e.g., "VAL001")
    fn id(&self) -> &str;

    /// Human-readable rule name
    fn name(&self) -> &str;

    /// Mandatory rules guard the fields persistence relies on and cannot be disabled
    fn mandatory(&self) -> bool {
        false
    }

    /// Check the whole batch. Rules see every row so batch-wide checks
    /// (duplicates) can attribute findings to the right row.
    fn check(&self, rows: &[NormalizedRow]) -> Vec<ValidationError>;
}
