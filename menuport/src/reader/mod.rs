//! Spreadsheet reader: XLSX/XLS through calamine, CSV through csv

use crate::config::ReaderConfig;
use crate::error::FileFormatError;
use calamine::{Data, Reader, Xls, Xlsx, open_workbook_from_rs};
use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;

pub mod row;

pub use row::{CellValue, Column, RawRow};

/// Sheet in template workbooks that only documents the columns
pub const INSTRUCTIONS_SHEET: &str = "Instructions";

/// Accepted upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Xlsx,
    Xls,
    Csv,
}

impl SourceFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" => Some(SourceFormat::Xlsx),
            "xls" => Some(SourceFormat::Xls),
            "csv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }

    /// Detect the format from a declared MIME type
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                Some(SourceFormat::Xlsx)
            }
            "application/vnd.ms-excel" => Some(SourceFormat::Xls),
            "text/csv" | "application/csv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }
}

/// Read menu rows from a file on disk
pub fn read_file<P: AsRef<Path>>(
    path: P,
    config: &ReaderConfig,
) -> Result<Vec<RawRow>, FileFormatError> {
    let path = path.as_ref();
    let format = SourceFormat::from_path(path)
        .ok_or_else(|| FileFormatError::UnsupportedFormat(path.display().to_string()))?;

    // Reject oversized uploads before reading them into memory
    let size = fs::metadata(path)?.len();
    check_size(size, config)?;

    let bytes = fs::read(path)?;
    read_bytes(&bytes, format, config)
}

/// Read menu rows from an in-memory upload
pub fn read_bytes(
    bytes: &[u8],
    format: SourceFormat,
    config: &ReaderConfig,
) -> Result<Vec<RawRow>, FileFormatError> {
    check_size(bytes.len() as u64, config)?;

    let grid = match format {
        SourceFormat::Csv => read_csv_grid(bytes)?,
        SourceFormat::Xlsx => read_workbook_grid::<Xlsx<_>>(bytes, &config.sheet_name)?,
        SourceFormat::Xls => read_workbook_grid::<Xls<_>>(bytes, &config.sheet_name)?,
    };

    let rows = rows_from_grid(grid)?;
    tracing::debug!(rows = rows.len(), ?format, "read menu rows");
    Ok(rows)
}

fn check_size(size: u64, config: &ReaderConfig) -> Result<(), FileFormatError> {
    if size > config.max_file_bytes {
        return Err(FileFormatError::TooLarge {
            size,
            limit: config.max_file_bytes,
        });
    }
    Ok(())
}

/// Cells of the selected sheet, top-left aligned to `first_row`
struct Grid {
    /// 0-based sheet row of the first grid row
    first_row: usize,
    rows: Vec<Vec<CellValue>>,
}

fn read_csv_grid(bytes: &[u8]) -> Result<Grid, FileFormatError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| FileFormatError::Unreadable(format!("CSV is not valid UTF-8: {}", e)))?;
    // Strip UTF-8 BOM if present
    let text = text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| FileFormatError::Unreadable(e.to_string()))?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(Grid { first_row: 0, rows })
}

fn read_workbook_grid<R>(bytes: &[u8], sheet_name: &str) -> Result<Grid, FileFormatError>
where
    R: Reader<Cursor<Vec<u8>>>,
    R::Error: std::fmt::Display,
{
    let mut workbook: R = open_workbook_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e: R::Error| FileFormatError::Unreadable(e.to_string()))?;

    let sheet_names = workbook.sheet_names();
    let selected = select_sheet(&sheet_names, sheet_name).ok_or(FileFormatError::SheetNotFound)?;
    tracing::debug!(sheet = %selected, available = ?sheet_names, "selected sheet");

    let range = workbook
        .worksheet_range(&selected)
        .map_err(|e| FileFormatError::Unreadable(e.to_string()))?;

    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let rows = range
        .rows()
        .map(|cells| {
            // Keep column positions stable when the used range does not start at A
            let mut row = vec![CellValue::Empty; first_col as usize];
            row.extend(cells.iter().map(parse_cell_value));
            row
        })
        .collect();

    Ok(Grid {
        first_row: first_row as usize,
        rows,
    })
}

/// Pick the designated sheet, falling back to the first non-instructions sheet
fn select_sheet(sheet_names: &[String], wanted: &str) -> Option<String> {
    sheet_names
        .iter()
        .find(|name| name.trim().eq_ignore_ascii_case(wanted.trim()))
        .or_else(|| {
            sheet_names
                .iter()
                .find(|name| !name.trim().eq_ignore_ascii_case(INSTRUCTIONS_SHEET))
        })
        .cloned()
}

fn rows_from_grid(grid: Grid) -> Result<Vec<RawRow>, FileFormatError> {
    let mut rows = grid.rows.into_iter().enumerate();

    // The first non-blank row holds the headers
    let (header_offset, headers) = rows
        .by_ref()
        .find(|(_, cells)| cells.iter().any(|c| !c.is_empty()))
        .ok_or(FileFormatError::MissingHeaders)?;

    let mut columns: HashMap<usize, Column> = HashMap::new();
    for (position, header) in headers.iter().enumerate() {
        let Some(label) = header_text(header) else {
            continue;
        };
        if let Some(column) = Column::from_header(&label) {
            if columns.values().any(|c| *c == column) {
                tracing::warn!(header = %label, "duplicate column ignored");
                continue;
            }
            columns.insert(position, column);
        }
    }

    if columns.is_empty() {
        return Err(FileFormatError::MissingHeaders);
    }

    let missing: Vec<String> = Column::REQUIRED
        .iter()
        .filter(|required| !columns.values().any(|c| c == *required))
        .map(|c| c.label().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(FileFormatError::MissingColumns(missing));
    }

    tracing::debug!(
        header_row = grid.first_row + header_offset + 1,
        columns = columns.len(),
        "located headers"
    );

    let mut result = Vec::new();
    for (offset, cells) in rows {
        let mut row = RawRow::new(grid.first_row + offset + 1);
        for (position, value) in cells.into_iter().enumerate() {
            if let Some(column) = columns.get(&position) {
                row.cells.insert(*column, value);
            }
        }
        if !row.is_blank() {
            result.push(row);
        }
    }

    Ok(result)
}

fn header_text(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Text(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(s.clone())
            }
        }
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        Data::Empty => CellValue::Empty,
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
