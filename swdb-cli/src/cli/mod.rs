//! Command line interface

pub mod commands;
pub mod report;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Config;
use commands::convert::{ConvertCommands, handle_convert_command};
use commands::load::{LoadCommands, handle_load_command};
use commands::push::{PushCommands, handle_push_command};
use commands::template::{TemplateCommands, handle_template_command};

#[derive(Parser, Debug)]
#[command(name = "swdb-cli")]
#[command(about = "Import software configuration workbooks into the software database")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Properties file (default: ./config/properties.json, then the user config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a workbook into software and installation JSON files
    Convert(ConvertCommands),
    /// Insert records into the document database
    Load(LoadCommands),
    /// POST records to the web API
    Push(PushCommands),
    /// Write an empty workbook with the expected header row
    Template(TemplateCommands),
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert(args) => handle_convert_command(args).await,
        Commands::Load(args) => {
            let config = Config::load(cli.config.as_deref())?;
            handle_load_command(args, &config).await
        }
        Commands::Push(args) => {
            let config = Config::load(cli.config.as_deref())?;
            handle_push_command(args, &config).await
        }
        Commands::Template(args) => handle_template_command(args).await,
    }
}
