//! POST records to the web API

mod handler;

use clap::Args;

use super::SourceArgs;

pub use handler::handle_push_command;

#[derive(Args, Debug)]
pub struct PushCommands {
    #[command(flatten)]
    pub source: SourceArgs,

    /// API base URL, overriding the properties file
    #[arg(long)]
    pub api_url: Option<String>,

    /// Web application URL for the login call (defaults to the API URL)
    #[arg(long)]
    pub web_url: Option<String>,

    /// Login user name
    #[arg(short, long)]
    pub username: Option<String>,

    /// Login password
    #[arg(short, long)]
    pub password: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Assemble and report without sending anything
    #[arg(long)]
    pub dry_run: bool,
}
