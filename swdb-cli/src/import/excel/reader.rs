//! Read configuration workbooks into raw rows

use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto};

/// Which worksheets of a workbook to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetSelection {
    /// Every sheet, in workbook order
    #[default]
    All,
    /// A single sheet by 0-based index
    Index(usize),
}

/// One data row of a worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based row number as shown in a spreadsheet application
    pub row_number: usize,
    /// Cells starting at column A
    pub cells: Vec<Data>,
}

/// Data rows of one worksheet (header excluded)
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRows {
    pub name: String,
    pub rows: Vec<RawRow>,
}

/// Read the selected worksheets of a workbook
///
/// The first used row of each sheet is the header and is dropped.
pub fn read_workbook<P: AsRef<Path>>(path: P, selection: SheetSelection) -> Result<Vec<SheetRows>> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        bail!("Workbook has no sheets: {}", path.display());
    }

    let selected: Vec<String> = match selection {
        SheetSelection::All => sheet_names,
        SheetSelection::Index(idx) => match sheet_names.get(idx) {
            Some(name) => vec![name.clone()],
            None => bail!(
                "Sheet index {} out of range, workbook has {} sheet(s)",
                idx,
                sheet_names.len()
            ),
        },
    };

    let mut sheets = Vec::with_capacity(selected.len());
    for name in selected {
        log::info!("Reading sheet {}", name);
        let range = workbook
            .worksheet_range(&name)
            .with_context(|| format!("Failed to read sheet: {}", name))?;

        // Ranges start at the first used cell; pad so indices line up with column A
        let (start_row, start_col) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let rows = range
            .rows()
            .enumerate()
            .skip(1)
            .map(|(idx, row)| {
                let mut cells = Vec::with_capacity(start_col + row.len());
                cells.resize(start_col, Data::Empty);
                cells.extend(row.iter().cloned());
                RawRow {
                    row_number: start_row + idx + 1,
                    cells,
                }
            })
            .collect::<Vec<_>>();

        log::debug!("Sheet {}: {} data rows", name, rows.len());
        sheets.push(SheetRows { name, rows });
    }

    Ok(sheets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn write_fixture(path: &Path) {
        let mut workbook = Workbook::new();

        let first = workbook.add_worksheet();
        first.set_name("DRR01").unwrap();
        first.write_string(0, 0, "Name").unwrap();
        first.write_string(0, 1, "Description").unwrap();
        first.write_string(1, 0, "widget-ioc").unwrap();
        first.write_number(1, 1, 2.0).unwrap();
        first.write_string(2, 0, "gadget-ioc").unwrap();

        let second = workbook.add_worksheet();
        second.set_name("DRR02").unwrap();
        // Leave column A and the first row unused
        second.write_string(1, 1, "Description").unwrap();
        second.write_string(2, 1, "offset").unwrap();

        workbook.save(path).unwrap();
    }

    #[test]
    fn test_read_all_sheets_skips_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.xlsx");
        write_fixture(&path);

        let sheets = read_workbook(&path, SheetSelection::All).unwrap();
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].name, "DRR01");
        assert_eq!(sheets[0].rows.len(), 2);
        assert_eq!(sheets[0].rows[0].row_number, 2);
        assert_eq!(sheets[0].rows[0].cells[0], Data::String("widget-ioc".into()));
        assert_eq!(sheets[0].rows[1].row_number, 3);
    }

    #[test]
    fn test_offset_range_is_padded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.xlsx");
        write_fixture(&path);

        let sheets = read_workbook(&path, SheetSelection::Index(1)).unwrap();
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].name, "DRR02");
        let row = &sheets[0].rows[0];
        assert_eq!(row.row_number, 3);
        assert_eq!(row.cells[0], Data::Empty);
        assert_eq!(row.cells[1], Data::String("offset".into()));
    }

    #[test]
    fn test_sheet_index_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.xlsx");
        write_fixture(&path);

        let err = read_workbook(&path, SheetSelection::Index(5)).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_missing_file() {
        let err = read_workbook("/nonexistent/config.xlsx", SheetSelection::All).unwrap_err();
        assert!(err.to_string().contains("Failed to open workbook"));
    }
}
