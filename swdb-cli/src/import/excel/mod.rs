//! Workbook I/O for configuration spreadsheets

pub mod cells;
mod reader;
mod template;

pub use reader::{RawRow, SheetRows, SheetSelection, read_workbook};
pub use template::write_template_excel;
