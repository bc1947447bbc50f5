//! Convert a workbook into software and installation JSON files

mod handler;

use std::path::PathBuf;

use clap::Args;

use super::WorkbookArgs;

pub use handler::handle_convert_command;

#[derive(Args, Debug)]
pub struct ConvertCommands {
    #[command(flatten)]
    pub input: WorkbookArgs,

    /// Output file for software records
    #[arg(long, default_value = "swOut.json")]
    pub software_out: PathBuf,

    /// Output file for installation records
    #[arg(long, default_value = "instOut.json")]
    pub install_out: PathBuf,
}
