//! Output formatters for previews and import results

use anyhow::Result;
use colored::*;
use menuport::config::CategoryMatching;
use menuport::report::Preview;
use menuport::{ImportSummary, ParsedImportResult, Progress};
use std::io::{IsTerminal, Write};
use std::path::Path;

/// Progress callback drawing a single updating line on stderr
pub fn progress_printer() -> impl FnMut(Progress) {
    let interactive = std::io::stderr().is_terminal();
    move |progress: Progress| {
        if !interactive {
            return;
        }
        let mut err = std::io::stderr();
        let _ = write!(
            err,
            "\rParsing rows: {:>3}% ({}/{})",
            progress.percent(),
            progress.processed,
            progress.total
        );
        if progress.percent() == 100 {
            let _ = writeln!(err);
        }
    }
}

/// Print the parse preview in human-readable format
pub fn print_preview(
    file_path: &Path,
    result: &ParsedImportResult,
    matching: CategoryMatching,
    limit: usize,
) {
    println!("{}", format!("Checking: {}", file_path.display()).bold());
    println!();

    println!(
        "{} {} rows, {} items, {} categories",
        "Read:".bold(),
        result.total_rows,
        result.menu_items.len(),
        result.categories.len()
    );
    if !result.categories.is_empty() {
        println!("{}", "Categories:".bold().underline());
        for category in &result.categories {
            let key = matching.key(&category.name);
            let count = result
                .menu_items
                .iter()
                .filter(|item| matching.key(&item.category_name) == key)
                .count();
            println!("  {} {}", category.name.cyan(), format!("({})", count).bright_black());
        }
    }
    println!();

    if !result.errors.is_empty() {
        println!("{}", "Errors:".red().bold().underline());
        print_findings(&Preview::new(&result.errors, limit), "ERROR".red().bold());
        println!();
    }

    if !result.warnings.is_empty() {
        println!("{}", "Warnings:".yellow().bold().underline());
        print_findings(&Preview::new(&result.warnings, limit), "WARN".yellow().bold());
        println!();
    }

    if result.errors.is_empty() && result.warnings.is_empty() {
        println!("{}", "✓ No problems found!".green().bold());
    }
}

fn print_findings(preview: &Preview, label: ColoredString) {
    for line in &preview.lines {
        println!("  {} {}", label, line);
    }
    if let Some(note) = preview.remainder_note() {
        println!("  {}", note.bright_black());
    }
}

pub fn print_fatal(file_path: &Path, message: &str) {
    eprintln!(
        "{} {}: {}",
        "ERROR".red().bold(),
        file_path.display(),
        message
    );
}

pub fn print_blocked() {
    println!(
        "{}",
        "Import blocked: fix the errors above and upload the file again.".red()
    );
}

pub fn print_summary(vendor: &str, summary: &ImportSummary, dry_run: bool) {
    let prefix = if dry_run { "[DRY RUN] " } else { "" };
    println!(
        "{}{}",
        prefix,
        format!("✓ Imported {} items for vendor {}", summary.items_inserted, vendor)
            .green()
            .bold()
    );
    println!(
        "  Categories: {} created, {} reused",
        summary.categories_created, summary.categories_reused
    );
}

/// Print the preview in JSON format
pub fn print_json(file_path: &Path, result: &ParsedImportResult) -> Result<()> {
    let output = serde_json::json!({
        "file": file_path.display().to_string(),
        "categories": result.categories,
        "menu_items": result.menu_items,
        "errors": result.errors,
        "warnings": result.warnings,
        "summary": {
            "rows": result.total_rows,
            "items": result.menu_items.len(),
            "errors": result.errors.len(),
            "warnings": result.warnings.len(),
            "can_import": result.can_confirm(),
        }
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
