//! Blank workbook with the expected columns

mod handler;

use std::path::PathBuf;

use clap::Args;

pub use handler::handle_template_command;

#[derive(Args, Debug)]
pub struct TemplateCommands {
    /// Where to write the workbook
    #[arg(default_value = "swdb-template.xlsx")]
    pub output: PathBuf,

    /// Sheet (DRR) names; repeat for several sheets
    #[arg(long = "sheet-name", value_name = "NAME")]
    pub sheet_names: Vec<String>,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}
