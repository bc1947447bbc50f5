//! End-of-run output for the user

use std::path::Path;

use anyhow::Result;
use colored::*;

use crate::api::{Collection, DeliveryReport};
use crate::import::types::{ImportBatch, Issue};
use crate::import::write_records_json;

pub fn print_issues(issues: &[Issue]) {
    if issues.is_empty() {
        return;
    }

    println!();
    println!("{}", format!("{} issue(s) found:", issues.len()).red().bold());
    for issue in issues {
        println!("  {}", issue.to_string().red());
    }
}

/// Write issues as JSON when a path was given
pub fn write_issues(path: Option<&Path>, issues: &[Issue]) -> Result<()> {
    if let Some(path) = path {
        write_records_json(path, issues)?;
        println!(
            "Issues saved to: {}",
            path.display().to_string().bright_green()
        );
    }
    Ok(())
}

pub fn print_summary(batch: &ImportBatch) {
    let summary = &batch.summary;
    println!();
    println!("{}", "Summary".bold());
    if summary.rows_read > 0 {
        println!("  Sheets read:            {}", summary.sheets);
        println!(
            "  Rows read:              {} ({} without installation name)",
            summary.rows_read, summary.rows_skipped
        );
    }
    println!(
        "  Software records:       {} new, {} duplicate",
        summary.software_created.to_string().green(),
        summary.software_skipped
    );
    println!(
        "  Installation records:   {} new, {} duplicate",
        summary.installs_created.to_string().green(),
        summary.installs_skipped
    );
    let issues = batch.issues.len().to_string();
    println!(
        "  Issues:                 {}",
        if batch.issues.is_empty() {
            issues.green()
        } else {
            issues.red()
        }
    );
}

pub fn print_delivery(target: &str, report: &DeliveryReport) {
    println!();
    println!("{} {}", "Delivered to".bold(), target.cyan());
    println!(
        "  {} software, {} installation record(s) accepted",
        report.succeeded(Collection::Software).to_string().green(),
        report.succeeded(Collection::Installation).to_string().green()
    );

    if report.is_clean() {
        return;
    }
    println!("  {}", format!("{} record(s) failed:", report.failed()).red());
    for failure in report.failures() {
        let status = failure
            .status_code
            .map(|s| format!(" (HTTP {})", s))
            .unwrap_or_default();
        println!(
            "    {} {}{}: {}",
            failure.collection,
            failure.record.yellow(),
            status,
            failure.error.as_deref().unwrap_or("unknown error").dimmed()
        );
    }
}
