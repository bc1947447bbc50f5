//! Workbook conversion: read rows, normalize fields, assemble records

mod assemble;
pub mod excel;
mod files;
mod normalize;
mod registry;
pub mod types;

pub use assemble::{BackfillPolicy, ImportOptions, ImportRun};
pub use files::{read_records_json, write_records_json};
pub use registry::KeyRegistry;
