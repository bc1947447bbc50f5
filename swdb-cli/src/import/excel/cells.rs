//! Cell access for configuration workbook rows

use calamine::Data;
use chrono::NaiveDate;

use crate::import::types::date::{from_excel_serial, parse_date_text};

/// Column indices of the configuration workbook layout
pub mod cols {
    pub const INSTALL_NAME: usize = 0;
    pub const DESCRIPTION: usize = 1;
    pub const SOFTWARE_NAME: usize = 2;
    pub const HOSTS: usize = 3;
    pub const STATUS: usize = 4;
    pub const VERSION: usize = 5;
    pub const AREA: usize = 6;
    pub const OWNER: usize = 7;
    pub const ENGINEER: usize = 8;
    pub const LEVEL_OF_CARE: usize = 9;
    pub const PLATFORMS: usize = 10;
    pub const VCS_TYPE: usize = 11;
    pub const VCS_LOCATION: usize = 12;
    pub const BUILD_TOOLS: usize = 13;
    pub const VV_RESULTS: usize = 14;
    pub const VV_DATE: usize = 15;
}

/// Header row written to template workbooks, one entry per column
pub const HEADERS: [&str; 16] = [
    "Name",
    "Description",
    "Name_1",
    "Host",
    "Status",
    "Version",
    "Area",
    "Owner",
    "Engineer",
    "Level Of Care",
    "Platforms",
    "VCS Type",
    "VCS Location",
    "Build Tools",
    "V&V Results",
    "V&V Date",
];

/// Render a cell as text; whole floats lose their fractional part
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => from_excel_serial(dt.as_f64())
            .map(|d| d.to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Empty | Data::Error(_) => String::new(),
    }
}

/// Text of the cell at `col`, empty when the row is short
pub fn get_cell_string(row: &[Data], col: usize) -> String {
    row.get(col).map(cell_text).unwrap_or_default()
}

/// Error for a date cell that holds something other than a date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCellError {
    pub raw: String,
}

impl std::fmt::Display for DateCellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot read '{}' as a date", self.raw)
    }
}

impl std::error::Error for DateCellError {}

/// Date held by the cell at `col`
///
/// Blank cells are `Ok(None)`. Serial numbers, date-formatted cells, ISO text
/// and M/D/YY text are accepted.
pub fn get_cell_date(row: &[Data], col: usize) -> Result<Option<NaiveDate>, DateCellError> {
    let Some(cell) = row.get(col) else {
        return Ok(None);
    };

    let parsed = match cell {
        Data::Empty => return Ok(None),
        Data::String(s) if s.trim().is_empty() => return Ok(None),
        Data::DateTime(dt) => from_excel_serial(dt.as_f64()),
        Data::Float(f) => from_excel_serial(*f),
        Data::Int(i) => from_excel_serial(*i as f64),
        Data::DateTimeIso(s) | Data::String(s) => parse_date_text(s),
        _ => None,
    };

    parsed.map(Some).ok_or_else(|| DateCellError {
        raw: cell_text(cell),
    })
}

/// All cell texts joined with spaces, for issue messages
pub fn row_context(row: &[Data]) -> String {
    row.iter().map(cell_text).collect::<Vec<_>>().join(" ")
}
