use std::time::Duration;

use anyhow::{Context, Result};
use colored::*;

use super::PushCommands;
use crate::api::SwdbClient;
use crate::cli::report::{print_delivery, print_issues, print_summary, write_issues};
use crate::config::Config;
use crate::import::KeyRegistry;
use crate::sink::{HttpSink, RecordSink};

pub async fn handle_push_command(args: PushCommands, config: &Config) -> Result<()> {
    let batch = args.source.batch(KeyRegistry::new())?;
    print_summary(&batch);

    if args.dry_run {
        println!("\n{}", "Dry run: nothing sent".yellow());
    } else if batch.is_empty() {
        println!("\n{}", "No records to send".yellow());
    } else {
        let mut sink = build_sink(&args, config)?;
        log::info!("Pushing {} records to {}", batch.record_count(), sink.describe());
        let report = sink.deliver(&batch).await?;
        print_delivery(&sink.describe(), &report);
    }

    print_issues(&batch.issues);
    write_issues(args.source.import.issues.as_deref(), &batch.issues)?;
    Ok(())
}

fn build_sink(args: &PushCommands, config: &Config) -> Result<HttpSink> {
    let api_url = match args.api_url.as_deref() {
        Some(url) => url,
        None => config.require_api_url()?,
    };
    let web_url = match (args.web_url.as_deref(), config.web_url.as_deref()) {
        (Some(url), _) | (None, Some(url)) => url,
        (None, None) => api_url,
    };
    let username = args
        .username
        .as_deref()
        .or(config.username.as_deref())
        .context("No user name given (--username, username or SWDB_USERNAME)")?;
    let password = args
        .password
        .as_deref()
        .or(config.password.as_deref())
        .context("No password given (--password, password or SWDB_PASSWORD)")?;

    let client = SwdbClient::new(api_url, web_url, args.timeout.map(Duration::from_secs))?;
    Ok(HttpSink::new(client, username, password))
}
