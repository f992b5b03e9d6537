//! Configuration system for the import pipeline

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Default upload limit: 5 MB
pub const DEFAULT_MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// Name of the worksheet holding menu rows
pub const DEFAULT_SHEET_NAME: &str = "Menu Items";

/// Main import configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default)]
    pub reader: ReaderConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl ImportConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ImportConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Check if a validation rule is enabled
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        !self
            .validation
            .disabled_rules
            .iter()
            .any(|selector| matches_rule_selector(selector, rule_id))
    }

    /// Validate the configuration against the known rule tokens.
    ///
    /// `mandatory` holds the ids of rules that can never be switched off.
    pub fn validate(&self, valid_tokens: &HashSet<String>, mandatory: &[&str]) -> Result<()> {
        if self.reader.max_file_bytes == 0 {
            anyhow::bail!("Configuration error: reader.max_file_bytes must be greater than 0");
        }

        for rule in &self.validation.disabled_rules {
            if rule == "ALL" {
                anyhow::bail!("Configuration error: 'ALL' is not allowed in disabled_rules");
            }
            if !valid_tokens.contains(rule) {
                anyhow::bail!(
                    "Configuration error: Unknown rule '{}' in disabled_rules",
                    rule
                );
            }
            if let Some(id) = mandatory
                .iter()
                .find(|id| matches_rule_selector(rule, id))
            {
                anyhow::bail!(
                    "Configuration error: '{}' would disable mandatory rule {}",
                    rule,
                    id
                );
            }
        }

        Ok(())
    }
}

/// Spreadsheet reader settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Files above this size are rejected before parsing
    pub max_file_bytes: u64,
    /// Sheet to read from multi-sheet workbooks (case-insensitive)
    pub sheet_name: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

/// What to do with a day-month date that already passed this year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRollover {
    /// "16th Sep" seen on 1st Oct resolves to next year's 16th Sep
    #[default]
    NextYear,
    /// Always resolve to the current year
    KeepPast,
}

/// Row normalizer settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub date_rollover: DateRollover,
}

/// How category names are compared when deduplicating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryMatching {
    #[default]
    CaseSensitive,
    CaseInsensitive,
}

impl CategoryMatching {
    /// Comparison key for a category name
    pub fn key(&self, name: &str) -> String {
        match self {
            CategoryMatching::CaseSensitive => name.trim().to_string(),
            CategoryMatching::CaseInsensitive => name.trim().to_lowercase(),
        }
    }
}

/// Treatment of a half price above the full price
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HalfPriceCheck {
    Off,
    #[default]
    Warning,
    Error,
}

/// Row validator settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub category_matching: CategoryMatching,
    pub half_price_check: HalfPriceCheck,
    /// Rule ids or prefixes of optional rules to skip
    pub disabled_rules: HashSet<String>,
}

/// Error report settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Findings shown interactively before "... and N more"
    pub preview_limit: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { preview_limit: 20 }
    }
}

fn matches_rule_selector(selector: &str, rule_id: &str) -> bool {
    if selector == "ALL" {
        return true;
    }
    rule_id == selector || rule_id.starts_with(selector)
}
