//! Write an empty configuration workbook with the expected header row

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

use super::cells::HEADERS;

/// Write a workbook with one sheet per name, each holding only the header row
pub fn write_template_excel<P: AsRef<Path>>(path: P, sheet_names: &[String]) -> Result<()> {
    let path = path.as_ref();
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let default_name = ["DRR01".to_string()];
    let names: &[String] = if sheet_names.is_empty() {
        &default_name
    } else {
        sheet_names
    };

    for name in names {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(name)
            .with_context(|| format!("Invalid sheet name: {}", name))?;

        for (col, header) in HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }
        worksheet.set_freeze_panes(1, 0)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

    Ok(())
}
