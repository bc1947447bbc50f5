//! Insert records into the document database

mod handler;

use clap::Args;

use super::SourceArgs;

pub use handler::handle_load_command;

#[derive(Args, Debug)]
pub struct LoadCommands {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Connection string, overriding the properties file
    #[arg(long)]
    pub database_url: Option<String>,

    /// Do not pre-register keys of documents already in the database
    #[arg(long)]
    pub no_seed: bool,

    /// Assemble and report without writing anything
    #[arg(long)]
    pub dry_run: bool,
}
