//! Rule registry for managing and creating rule instances

use super::*;
use crate::config::ImportConfig;
use std::collections::HashSet;

/// Get all valid configuration tokens (Rule IDs and the "VAL" prefix)
pub fn get_all_valid_tokens() -> HashSet<String> {
    let mut tokens = HashSet::new();
    tokens.insert("ALL".to_string());
    tokens.insert("VAL".to_string());

    for rule in create_all_rules(&ImportConfig::default()) {
        tokens.insert(rule.id().to_string());
    }
    // Present even when the default configuration leaves it out
    tokens.insert("VAL006".to_string());

    tokens
}

/// IDs of rules that can never be disabled
pub fn mandatory_rule_ids() -> Vec<&'static str> {
    vec!["VAL001", "VAL002", "VAL003", "VAL004", "VAL005"]
}

/// Create all enabled rules based on configuration
pub fn create_enabled_rules(config: &ImportConfig) -> Vec<Box<dyn ValidationRule>> {
    create_all_rules(config)
        .into_iter()
        .filter(|rule| rule.mandatory() || config.is_rule_enabled(rule.id()))
        .collect()
}

/// Create instances of all available rules
fn create_all_rules(config: &ImportConfig) -> Vec<Box<dyn ValidationRule>> {
    let mut rules: Vec<Box<dyn ValidationRule>> = vec![
        Box::new(val001_required_category::RequiredCategoryRule),
        Box::new(val002_required_item_name::RequiredItemNameRule),
        Box::new(val003_duplicate_items::DuplicateItemsRule::new(config)),
        Box::new(val004_price::PriceRule),
        Box::new(val005_half_price::HalfPriceRule),
        Box::new(val007_date::DateRule),
        Box::new(val008_spice_level::SpiceLevelRule),
    ];

    if let Some(rule) = val006_half_price_exceeds_price::HalfPriceExceedsPriceRule::new(config) {
        rules.push(Box::new(rule));
    }

    rules
}
