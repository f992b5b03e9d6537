use chrono::NaiveDate;
use menuport::config::{CategoryMatching, ImportConfig};
use menuport::{CellValue, Column, FileFormatError, MenuDate, MenuImporter, SpiceLevel};
use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::Path;

fn importer() -> MenuImporter {
    MenuImporter::new().with_today(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
}

// Helper to write a workbook with an instructions sheet in front of the data
fn create_menu_xlsx(path: &Path, rows: &[[&str; 5]]) -> anyhow::Result<()> {
    let mut workbook = Workbook::new();

    let notes = workbook.add_worksheet();
    notes.set_name("Instructions")?;
    notes.write_string(0, 0, "Category")?;
    notes.write_string(0, 1, "Item Name")?;
    notes.write_string(0, 2, "Price")?;
    notes.write_string(1, 0, "This sheet must be ignored")?;

    let sheet = workbook.add_worksheet();
    sheet.set_name("Menu Items")?;
    for (col, header) in ["Category", "Item Name", "Price", "Half Plate", "Date"]
        .iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, *header)?;
    }
    for (i, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(i as u32 + 1, col as u16, *value)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

#[test]
fn test_template_parses_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("template.xlsx");
    menuport::writer::write_template(&path).unwrap();

    let result = importer().parse_file(&path, &mut |_| {}).unwrap();

    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    assert_eq!(result.menu_items.len(), menuport::writer::SAMPLE_ROWS.len());

    let names: Vec<_> = result.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["South Indian", "North Indian", "Snacks"]);

    let dosa = &result.menu_items[0];
    assert_eq!(dosa.row, 2);
    assert_eq!(dosa.item_name, "Masala Dosa");
    assert_eq!(dosa.price, 80.0);
    assert_eq!(dosa.half_price, Some(50.0));
    assert_eq!(dosa.date, Some(MenuDate::Daily));
    assert_eq!(dosa.spice_level, Some(SpiceLevel::Medium));

    let idli = &result.menu_items[1];
    assert_eq!(idli.dietary_tags.len(), 3);
}

#[test]
fn test_only_menu_items_sheet_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("menu.xlsx");
    create_menu_xlsx(
        &path,
        &[
            ["South Indian", "Idli", "₹40", "", "Daily"],
            ["South Indian", "Dosa", "60 rs", "40", "16th Sep"],
            ["Snacks", "Samosa", "", "", ""],
        ],
    )
    .unwrap();

    let result = importer().parse_file(&path, &mut |_| {}).unwrap();

    assert_eq!(result.total_rows, 3);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].row, 4);
    assert_eq!(result.errors[0].field, Column::Price.label());
    assert_eq!(result.menu_items.len(), 2);
    assert!(!result.can_confirm());

    assert_eq!(
        result.menu_items[1].date,
        Some(MenuDate::On(NaiveDate::from_ymd_opt(2024, 9, 16).unwrap()))
    );
}

#[test]
fn test_csv_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("menu.csv");
    fs::write(
        &path,
        "Date,Meal Type,Category,Item Name,Price,Half Plate,Description,Spice Level,Dietary Tags\n\
         Weekly-Monday,Lunch,Thali,Veg Thali,₹150,,Full meal,Medium,\"Vegetarian, Vegan,,Gluten-Free\"\n\
         Daily,Breakfast,Beverages,Filter Coffee,150.00,,,,\n\
         Daily,Breakfast,Beverages,Filter Coffee,25,,,,\n",
    )
    .unwrap();

    let result = importer().parse_file(&path, &mut |_| {}).unwrap();

    assert_eq!(result.menu_items.len(), 2);
    assert_eq!(result.menu_items[0].price, 150.0);
    assert_eq!(result.menu_items[1].price, 150.0);
    assert_eq!(result.menu_items[0].dietary_tags.len(), 3);

    // The repeated coffee row is the duplicate, not the first one
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].row, 4);
    assert_eq!(result.errors[0].rule_id, "VAL003");
}

#[test]
fn test_rupee_suffix_prices_and_negative_cells() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("menu.csv");
    fs::write(
        &path,
        "Category,Item Name,Price,Half Plate\n\
         Thali,Veg Thali,₹150/-,Rs. 90/-\n\
         Thali,Mini Thali,₹-20,\n",
    )
    .unwrap();

    let result = importer().parse_file(&path, &mut |_| {}).unwrap();

    assert_eq!(result.menu_items.len(), 1);
    assert_eq!(result.menu_items[0].price, 150.0);
    assert_eq!(result.menu_items[0].half_price, Some(90.0));

    // The report quotes the cell as typed, not the parsed number
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].row, 3);
    assert_eq!(result.errors[0].value, CellValue::Text("₹-20".to_string()));
    assert!(result.errors[0].to_string().ends_with("(Value: ₹-20)"));
}

#[test]
fn test_dry_run_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("menu.csv");
    fs::write(
        &path,
        "Category,Item Name,Price\nB,one,1\nA,two,2\nB,three,3\nC,four,4\n",
    )
    .unwrap();

    let importer = importer();
    let first = importer.parse_file(&path, &mut |_| {}).unwrap();
    let second = importer.parse_file(&path, &mut |_| {}).unwrap();

    assert_eq!(first.categories, second.categories);
    assert_eq!(first.categories.len(), 3);
    assert_eq!(first, second);
}

#[test]
fn test_case_insensitive_categories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("menu.csv");
    fs::write(&path, "Category,Item Name,Price\nSnacks,Samosa,15\nsnacks,Vada,20\n").unwrap();

    let mut config = ImportConfig::default();
    config.validation.category_matching = CategoryMatching::CaseInsensitive;
    let result = MenuImporter::with_config(config)
        .parse_file(&path, &mut |_| {})
        .unwrap();

    assert_eq!(result.categories.len(), 1);
    assert_eq!(result.categories[0].name, "Snacks");
}

#[test]
fn test_fatal_file_errors() {
    let dir = tempfile::tempdir().unwrap();

    let unsupported = dir.path().join("menu.pdf");
    fs::write(&unsupported, "whatever").unwrap();
    assert!(matches!(
        importer().parse_file(&unsupported, &mut |_| {}),
        Err(FileFormatError::UnsupportedFormat(_))
    ));

    let headerless = dir.path().join("headerless.csv");
    fs::write(&headerless, "\n\n").unwrap();
    assert!(matches!(
        importer().parse_file(&headerless, &mut |_| {}),
        Err(FileFormatError::MissingHeaders)
    ));

    let mut config = ImportConfig::default();
    config.reader.max_file_bytes = 16;
    let big = dir.path().join("big.csv");
    fs::write(&big, "Category,Item Name,Price\nSnacks,Samosa,15\n").unwrap();
    assert!(matches!(
        MenuImporter::with_config(config).parse_file(&big, &mut |_| {}),
        Err(FileFormatError::TooLarge { .. })
    ));

    let missing = dir.path().join("missing.csv");
    assert!(matches!(
        importer().parse_file(&missing, &mut |_| {}),
        Err(FileFormatError::Io(_))
    ));
}
