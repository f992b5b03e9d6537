// ! Writer module for the downloadable import template

mod template;

pub use template::{SAMPLE_ROWS, build_template};

use anyhow::{Context, Result};
use std::path::Path;

/// Write the template workbook to `path`
pub fn write_template<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") => {}
        _ => anyhow::bail!("Template must be written as .xlsx"),
    }

    let mut workbook = build_template()?;
    workbook
        .save(path)
        .with_context(|| format!("Failed to write template: {}", path.display()))?;
    Ok(())
}

/// Template workbook as bytes, for serving as a download
pub fn template_bytes() -> Result<Vec<u8>> {
    let mut workbook = build_template()?;
    Ok(workbook.save_to_buffer()?)
}
