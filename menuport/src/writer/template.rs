use crate::config::DEFAULT_SHEET_NAME;
use crate::reader::{Column, INSTRUCTIONS_SHEET};
use anyhow::Result;
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};

/// Example rows written below the headers, in `Column::ALL` order.
/// An empty string leaves the cell blank.
pub const SAMPLE_ROWS: [[&str; 9]; 4] = [
    [
        "Daily",
        "Breakfast",
        "South Indian",
        "Masala Dosa",
        "80",
        "50",
        "Crispy dosa with potato filling",
        "Medium",
        "Vegetarian",
    ],
    [
        "Daily",
        "Breakfast",
        "South Indian",
        "Idli (2 pcs)",
        "40",
        "",
        "Steamed rice cakes with chutney",
        "Mild",
        "Vegetarian, Vegan, Gluten-Free",
    ],
    [
        "Weekly-Friday",
        "Lunch",
        "North Indian",
        "Paneer Butter Masala",
        "160",
        "90",
        "",
        "Hot",
        "Vegetarian",
    ],
    [
        "16th Sep",
        "Snacks",
        "Snacks",
        "Samosa",
        "15",
        "",
        "Festival special",
        "",
        "Vegetarian",
    ],
];

const INSTRUCTIONS: [(&str, &str); 9] = [
    ("Date", "Optional. A date (2024-09-16, 16/09/2024, 16th Sep), 'Daily' or 'Weekly-<Day>' e.g. Weekly-Monday."),
    ("Meal Type", "Optional. Breakfast, Lunch, Snacks, Dinner..."),
    ("Category", "Required. Categories are created automatically if they do not exist."),
    ("Item Name", "Required. Must be unique within its category."),
    ("Price", "Required. Number, currency symbols are ignored (₹150, 150 rs)."),
    ("Half Plate", "Optional. Price of a half portion, should not exceed Price."),
    ("Description", "Optional. Free text."),
    ("Spice Level", "Optional. Mild, Medium, Hot or Extra Hot."),
    ("Dietary Tags", "Optional. Comma separated, e.g. Vegetarian, Vegan, Gluten-Free."),
];

/// Build the template: a "Menu Items" sheet with headers and sample rows,
/// and an "Instructions" sheet the importer ignores
pub fn build_template() -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let header = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xD9E1F2));

    write_menu_sheet(workbook.add_worksheet(), &header)?;
    write_instructions_sheet(workbook.add_worksheet(), &header)?;

    Ok(workbook)
}

fn write_menu_sheet(sheet: &mut Worksheet, header: &Format) -> Result<()> {
    sheet.set_name(DEFAULT_SHEET_NAME)?;

    for (col, column) in Column::ALL.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, column.label(), header)?;
        sheet.set_column_width(col, 18)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    for (row, values) in SAMPLE_ROWS.iter().enumerate() {
        let row = row as u32 + 1;
        for (col, value) in values.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let col = col as u16;
            match Column::ALL[col as usize] {
                Column::Price | Column::HalfPrice => match value.parse::<f64>() {
                    Ok(number) => sheet.write_number(row, col, number)?,
                    Err(_) => sheet.write_string(row, col, *value)?,
                },
                _ => sheet.write_string(row, col, *value)?,
            };
        }
    }

    Ok(())
}

fn write_instructions_sheet(sheet: &mut Worksheet, header: &Format) -> Result<()> {
    sheet.set_name(INSTRUCTIONS_SHEET)?;
    sheet.write_string_with_format(0, 0, "Column", header)?;
    sheet.write_string_with_format(0, 1, "How to fill it", header)?;
    sheet.set_column_width(0, 18)?;
    sheet.set_column_width(1, 90)?;

    for (i, (column, text)) in INSTRUCTIONS.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, *column)?;
        sheet.write_string(row, 1, *text)?;
    }

    let footer = INSTRUCTIONS.len() as u32 + 2;
    sheet.write_string(
        footer,
        0,
        "Only the 'Menu Items' sheet is imported. Files up to 5 MB (.xlsx, .xls, .csv).",
    )?;

    Ok(())
}
