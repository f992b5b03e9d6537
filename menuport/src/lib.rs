//! menuport: menu spreadsheet import pipeline
//!
//! Turns an uploaded XLSX/XLS/CSV file into validated categories and menu
//! items (Read → Normalize → Validate → Resolve categories), and persists them
//! through a [`store::MenuStore`] once the user confirms.

pub mod categories;
pub mod config;
pub mod error;
pub mod importer;
pub mod normalize;
pub mod reader;
pub mod report;
pub mod result;
pub mod rules;
pub mod store;
pub mod violation;
pub mod writer;

use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::Path;

pub use categories::{CategoryResolver, CategorySpec};
pub use config::ImportConfig;
pub use error::{FileFormatError, ImportError, PersistenceError};
pub use importer::{ImportSession, ImportState, ImportSummary, Progress};
pub use normalize::{MenuDate, NormalizedRow, Normalizer, Parsed, SpiceLevel};
pub use reader::{CellValue, Column, RawRow, SourceFormat};
pub use result::{MenuItemRecord, ParsedImportResult};
pub use rules::ValidationRule;
pub use store::{JsonFileStore, MemoryStore, MenuStore};
pub use violation::{Severity, ValidationError};

/// Parsing half of the pipeline: everything up to the preview
pub struct MenuImporter {
    config: ImportConfig,
    rules: Vec<Box<dyn ValidationRule>>,
    normalizer: Normalizer,
    resolver: CategoryResolver,
}

impl MenuImporter {
    /// Create a new importer with default configuration
    pub fn new() -> Self {
        Self::with_config(ImportConfig::default())
    }

    /// Create a new importer with custom configuration
    pub fn with_config(config: ImportConfig) -> Self {
        let rules = rules::registry::create_enabled_rules(&config);
        let normalizer = Normalizer::new(&config);
        let resolver = CategoryResolver::new(config.validation.category_matching);
        Self {
            config,
            rules,
            normalizer,
            resolver,
        }
    }

    /// Pin the reference day for dates written without a year
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.normalizer = self.normalizer.with_today(today);
        self
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn resolver(&self) -> CategoryResolver {
        self.resolver
    }

    /// Read and validate a file on disk
    pub fn parse_file<P: AsRef<Path>>(
        &self,
        path: P,
        progress: &mut dyn FnMut(Progress),
    ) -> Result<ParsedImportResult, FileFormatError> {
        let rows = reader::read_file(path, &self.config.reader)?;
        Ok(self.parse_rows(&rows, progress))
    }

    /// Read and validate an in-memory upload
    pub fn parse_bytes(
        &self,
        bytes: &[u8],
        format: SourceFormat,
        progress: &mut dyn FnMut(Progress),
    ) -> Result<ParsedImportResult, FileFormatError> {
        let rows = reader::read_bytes(bytes, format, &self.config.reader)?;
        Ok(self.parse_rows(&rows, progress))
    }

    /// Normalize, validate and resolve categories for already-read rows.
    ///
    /// Every row is checked; findings from all rows are collected before
    /// returning. Progress follows the rows being normalized and only
    /// reaches 100% once validation has finished.
    pub fn parse_rows(
        &self,
        rows: &[RawRow],
        progress: &mut dyn FnMut(Progress),
    ) -> ParsedImportResult {
        let total = rows.len();
        let mut normalized = Vec::with_capacity(total);
        let mut last_percent = None;

        for (i, raw) in rows.iter().enumerate() {
            normalized.push(self.normalizer.normalize(raw));

            let step = Progress::new(i + 1, total);
            if i + 1 < total && last_percent != Some(step.percent()) {
                last_percent = Some(step.percent());
                progress(step);
            }
        }

        let mut findings: Vec<ValidationError> = self
            .rules
            .iter()
            .flat_map(|rule| rule.check(&normalized))
            .collect();
        findings.sort();
        progress(Progress::new(total, total));

        let (errors, warnings): (Vec<_>, Vec<_>) =
            findings.into_iter().partition(ValidationError::is_error);

        let rejected: HashSet<usize> = errors.iter().map(|e| e.row).collect();
        let menu_items: Vec<MenuItemRecord> = normalized
            .iter()
            .filter(|row| !rejected.contains(&row.row))
            .filter_map(MenuItemRecord::from_row)
            .collect();
        let categories = self.resolver.resolve(&menu_items);

        tracing::info!(
            rows = total,
            items = menu_items.len(),
            categories = categories.len(),
            errors = errors.len(),
            warnings = warnings.len(),
            "parsed menu file"
        );

        ParsedImportResult {
            categories,
            menu_items,
            errors,
            warnings,
            total_rows: total,
        }
    }
}

impl Default for MenuImporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn raw(index: usize, category: &str, item: &str, price: &str) -> RawRow {
        RawRow::new(index)
            .with(Column::Category, text(category))
            .with(Column::ItemName, text(item))
            .with(Column::Price, text(price))
    }

    #[test]
    fn test_missing_required_fields_one_error_each() {
        let rows = vec![
            raw(2, "", "Idli", "40"),
            raw(3, "Snacks", "", "20"),
            raw(4, "", "", "10"),
            raw(5, "Snacks", "Vada", "30"),
        ];

        let result = MenuImporter::new().parse_rows(&rows, &mut |_| {});

        let per_row = |row: usize| result.errors.iter().filter(|e| e.row == row).count();
        assert_eq!(per_row(2), 1);
        assert_eq!(per_row(3), 1);
        assert_eq!(per_row(4), 2);
        assert_eq!(result.menu_items.len(), 1);
        assert_eq!(result.menu_items[0].row, 5);
    }

    #[test]
    fn test_valid_valid_missing_price() {
        let rows = vec![
            raw(2, "South Indian", "Idli", "₹40"),
            raw(3, "South Indian", "Dosa", "60 rs"),
            raw(4, "Snacks", "Samosa", ""),
        ];

        let result = MenuImporter::new().parse_rows(&rows, &mut |_| {});
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].row, 4);
        assert_eq!(result.menu_items.len(), 2);
        assert!(!result.can_confirm());
        // Categories only come from rows that passed validation
        assert_eq!(result.categories.len(), 1);
    }

    #[test]
    fn test_warnings_do_not_exclude_rows() {
        let rows = vec![
            raw(2, "Mains", "Thali", "100")
                .with(Column::HalfPrice, text("150"))
                .with(Column::SpiceLevel, text("lava")),
        ];

        let result = MenuImporter::new().parse_rows(&rows, &mut |_| {});
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.menu_items.len(), 1);
        assert!(result.can_confirm());
    }

    #[test]
    fn test_progress_reports_up_to_100() {
        let rows: Vec<RawRow> = (0..250)
            .map(|i| raw(i + 2, "Snacks", &format!("Item {}", i), "10"))
            .collect();

        let mut seen = Vec::new();
        MenuImporter::new().parse_rows(&rows, &mut |p| seen.push(p.percent()));

        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert!(seen.len() <= 101);
    }

    struct FlagRule(Arc<AtomicBool>);

    impl ValidationRule for FlagRule {
        fn id(&self) -> &str {
            "TEST"
        }

        fn name(&self) -> &str {
            "Flag"
        }

        fn check(&self, _rows: &[NormalizedRow]) -> Vec<ValidationError> {
            self.0.store(true, Ordering::SeqCst);
            Vec::new()
        }
    }

    #[test]
    fn test_progress_completes_after_validation() {
        let checked = Arc::new(AtomicBool::new(false));
        let mut importer = MenuImporter::new();
        importer.rules.push(Box::new(FlagRule(Arc::clone(&checked))));

        let rows: Vec<RawRow> = (0..3)
            .map(|i| raw(i + 2, "Snacks", &format!("Item {}", i), "10"))
            .collect();
        let mut seen = Vec::new();
        importer.parse_rows(&rows, &mut |p| {
            seen.push((p.percent(), checked.load(Ordering::SeqCst)));
        });

        assert_eq!(seen, vec![(33, false), (66, false), (100, true)]);
    }

    #[test]
    fn test_empty_file_reports_complete() {
        let mut seen = Vec::new();
        let result = MenuImporter::new().parse_rows(&[], &mut |p| seen.push(p.percent()));
        assert_eq!(seen, vec![100]);
        assert!(!result.can_confirm());
    }
}
