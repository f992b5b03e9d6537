//! Row normalizer: best-effort coercion of raw cells into typed fields.
//!
//! Normalization never fails. Values that cannot be coerced are carried as
//! [`Parsed::Invalid`] with the original cell so the validator can report
//! them precisely.

use crate::config::{DateRollover, ImportConfig};
use crate::reader::row::format_number;
use crate::reader::{CellValue, Column, RawRow};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

pub mod date;

pub use date::MenuDate;

/// Outcome of coercing one cell
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    Absent,
    Valid(T),
    /// Present but not coercible; holds the original cell
    Invalid(CellValue),
}

impl<T> Parsed<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            Parsed::Valid(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Parsed::Absent)
    }
}

/// Heat level of a dish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpiceLevel {
    Mild,
    Medium,
    Hot,
    ExtraHot,
}

impl SpiceLevel {
    pub fn parse(text: &str) -> Option<Self> {
        let normalized = text
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        match normalized.as_str() {
            "mild" | "low" => Some(SpiceLevel::Mild),
            "medium" => Some(SpiceLevel::Medium),
            "hot" | "spicy" | "high" => Some(SpiceLevel::Hot),
            "extra hot" | "very hot" | "extra spicy" => Some(SpiceLevel::ExtraHot),
            _ => None,
        }
    }
}

impl fmt::Display for SpiceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SpiceLevel::Mild => "Mild",
            SpiceLevel::Medium => "Medium",
            SpiceLevel::Hot => "Hot",
            SpiceLevel::ExtraHot => "Extra Hot",
        })
    }
}

/// Typed projection of a [`RawRow`]
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    /// 1-based sheet row, header is row 1
    pub row: usize,
    pub date: Parsed<MenuDate>,
    pub meal_type: Option<String>,
    pub category_name: Option<String>,
    pub item_name: Option<String>,
    pub price: Parsed<f64>,
    pub half_price: Parsed<f64>,
    /// Cells as read, cited when a parsed price is rejected
    pub price_cell: CellValue,
    pub half_price_cell: CellValue,
    pub description: Option<String>,
    pub spice_level: Parsed<SpiceLevel>,
    pub dietary_tags: BTreeSet<String>,
}

impl NormalizedRow {
    /// An all-absent row, handy as a base for building test rows
    pub fn empty(row: usize) -> Self {
        Self {
            row,
            date: Parsed::Absent,
            meal_type: None,
            category_name: None,
            item_name: None,
            price: Parsed::Absent,
            half_price: Parsed::Absent,
            price_cell: CellValue::Empty,
            half_price_cell: CellValue::Empty,
            description: None,
            spice_level: Parsed::Absent,
            dietary_tags: BTreeSet::new(),
        }
    }
}

/// Converts raw rows into typed rows
#[derive(Debug, Clone)]
pub struct Normalizer {
    today: NaiveDate,
    rollover: DateRollover,
}

impl Normalizer {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            today: chrono::Local::now().date_naive(),
            rollover: config.normalize.date_rollover,
        }
    }

    /// Pin the reference day used for dates written without a year
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn normalize(&self, raw: &RawRow) -> NormalizedRow {
        NormalizedRow {
            row: raw.index,
            date: self.normalize_date(raw.get(Column::Date)),
            meal_type: cell_text(raw.get(Column::MealType)),
            category_name: cell_text(raw.get(Column::Category)),
            item_name: cell_text(raw.get(Column::ItemName)),
            price: parse_price(raw.get(Column::Price)),
            half_price: parse_price(raw.get(Column::HalfPrice)),
            price_cell: raw.get(Column::Price).clone(),
            half_price_cell: raw.get(Column::HalfPrice).clone(),
            description: cell_text(raw.get(Column::Description)),
            spice_level: parse_spice_level(raw.get(Column::SpiceLevel)),
            dietary_tags: cell_text(raw.get(Column::DietaryTags))
                .map(|text| parse_tags(&text))
                .unwrap_or_default(),
        }
    }

    fn normalize_date(&self, cell: &CellValue) -> Parsed<MenuDate> {
        if cell.is_empty() {
            return Parsed::Absent;
        }
        let parsed = match cell {
            CellValue::DateTime(serial) | CellValue::Number(serial) => {
                date::from_serial(*serial).map(MenuDate::On)
            }
            CellValue::Text(text) => date::parse_date_text(text, self.today, self.rollover),
            _ => None,
        };
        match parsed {
            Some(date) => Parsed::Valid(date),
            None => Parsed::Invalid(cell.clone()),
        }
    }
}

/// Trimmed text of a cell, `None` when blank
fn cell_text(cell: &CellValue) -> Option<String> {
    let text = match cell {
        CellValue::Empty => return None,
        CellValue::Text(s) => s.trim().to_string(),
        CellValue::Number(n) => format_number(*n),
        other => other.to_string().trim().to_string(),
    };
    if text.is_empty() { None } else { Some(text) }
}

/// Parse a price, tolerating currency symbols and units ("₹150", "150 rs")
pub fn parse_price(cell: &CellValue) -> Parsed<f64> {
    static CURRENCY: OnceLock<Regex> = OnceLock::new();

    match cell {
        CellValue::Empty => Parsed::Absent,
        CellValue::Number(n) if n.is_finite() => Parsed::Valid(*n),
        CellValue::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Parsed::Absent;
            }
            // Drop currency words first so "Rs. 150" does not become ".150"
            let re = CURRENCY
                .get_or_init(|| Regex::new(r"(?i)\b(?:rs|inr|usd|eur)\b\.?").unwrap());
            let without_words = re.replace_all(text, "");
            // A minus is a sign only ahead of the first digit; "150/-" is a plain 150
            let negative = without_words
                .split(|c: char| c.is_ascii_digit())
                .next()
                .is_some_and(|lead| lead.contains('-'));
            let digits: String = without_words
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            match digits.parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    Parsed::Valid(if negative { -value } else { value })
                }
                _ => Parsed::Invalid(cell.clone()),
            }
        }
        other => Parsed::Invalid(other.clone()),
    }
}

fn parse_spice_level(cell: &CellValue) -> Parsed<SpiceLevel> {
    match cell_text(cell) {
        None => Parsed::Absent,
        Some(text) => match SpiceLevel::parse(&text) {
            Some(level) => Parsed::Valid(level),
            None => Parsed::Invalid(cell.clone()),
        },
    }
}

/// Split comma separated tags; empties dropped, duplicates collapse
pub fn parse_tags(text: &str) -> BTreeSet<String> {
    text.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
