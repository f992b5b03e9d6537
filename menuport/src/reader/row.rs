//! Raw row data structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Columns the pipeline understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    Date,
    MealType,
    Category,
    ItemName,
    Price,
    HalfPrice,
    Description,
    SpiceLevel,
    DietaryTags,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Date,
        Column::MealType,
        Column::Category,
        Column::ItemName,
        Column::Price,
        Column::HalfPrice,
        Column::Description,
        Column::SpiceLevel,
        Column::DietaryTags,
    ];

    /// Columns a file must provide
    pub const REQUIRED: [Column; 3] = [Column::Category, Column::ItemName, Column::Price];

    /// Header label as it appears in the template
    pub fn label(&self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::MealType => "Meal Type",
            Column::Category => "Category",
            Column::ItemName => "Item Name",
            Column::Price => "Price",
            Column::HalfPrice => "Half Plate",
            Column::Description => "Description",
            Column::SpiceLevel => "Spice Level",
            Column::DietaryTags => "Dietary Tags",
        }
    }

    /// Match a header cell against the known labels and their aliases
    pub fn from_header(header: &str) -> Option<Column> {
        let normalized = header
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        match normalized.as_str() {
            "date" => Some(Column::Date),
            "meal type" | "meal" => Some(Column::MealType),
            "category" => Some(Column::Category),
            "item name" | "item" => Some(Column::ItemName),
            "price" => Some(Column::Price),
            "half plate" | "half price" => Some(Column::HalfPrice),
            "description" => Some(Column::Description),
            "spice level" | "spice" => Some(Column::SpiceLevel),
            "dietary tags" | "tags" => Some(Column::DietaryTags),
            _ => None,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cell value types
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    /// Native spreadsheet date, stored as its serial number
    DateTime(f64),
    Error(String),
}

impl CellValue {
    /// Check if the cell is empty (blank text counts as empty)
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Get the text if this is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) | CellValue::DateTime(n) => write!(f, "{}", format_number(*n)),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Boolean(b) => write!(f, "{}", b),
            CellValue::Error(e) => write!(f, "#{}", e),
        }
    }
}

/// Render whole numbers without a trailing ".0"
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One data row of the uploaded sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// 1-based sheet row, header is row 1
    pub index: usize,
    pub cells: HashMap<Column, CellValue>,
}

impl RawRow {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            cells: HashMap::new(),
        }
    }

    /// Get the cell for a column; missing columns read as empty
    pub fn get(&self, column: Column) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells.get(&column).unwrap_or(&EMPTY)
    }

    pub fn with(mut self, column: Column, value: CellValue) -> Self {
        self.cells.insert(column, value);
        self
    }

    /// Whether every cell in the row is blank
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(CellValue::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_matching() {
        assert_eq!(Column::from_header("Item Name"), Some(Column::ItemName));
        assert_eq!(Column::from_header("  item   name "), Some(Column::ItemName));
        assert_eq!(Column::from_header("HALF PRICE"), Some(Column::HalfPrice));
        assert_eq!(Column::from_header("Half Plate"), Some(Column::HalfPrice));
        assert_eq!(Column::from_header("Tags"), Some(Column::DietaryTags));
        assert_eq!(Column::from_header("Calories"), None);
    }

    #[test]
    fn test_labels_round_trip() {
        for column in Column::ALL {
            assert_eq!(Column::from_header(column.label()), Some(column));
        }
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(CellValue::Number(150.0).to_string(), "150");
        assert_eq!(CellValue::Number(99.5).to_string(), "99.5");
        assert_eq!(CellValue::Text("₹150".into()).to_string(), "₹150");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn test_blank_row() {
        let row = RawRow::new(2)
            .with(Column::Category, CellValue::Text("  ".into()))
            .with(Column::Price, CellValue::Empty);
        assert!(row.is_blank());
        assert!(row.get(Column::ItemName).is_empty());

        let row = row.with(Column::ItemName, CellValue::Text("Idli".into()));
        assert!(!row.is_blank());
    }
}
