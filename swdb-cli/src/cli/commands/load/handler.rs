use anyhow::Result;
use colored::*;

use super::LoadCommands;
use crate::cli::report::{print_delivery, print_issues, print_summary, write_issues};
use crate::config::Config;
use crate::import::KeyRegistry;
use crate::sink::{DocumentStoreSink, RecordSink};
use crate::store;

pub async fn handle_load_command(args: LoadCommands, config: &Config) -> Result<()> {
    let mut sink = if args.dry_run {
        None
    } else {
        let url = match args.database_url.as_deref() {
            Some(url) => url,
            None => config.require_database_url()?,
        };
        Some(DocumentStoreSink::new(store::open(url).await?))
    };

    let mut registry = KeyRegistry::new();
    if let Some(sink) = &sink {
        if !args.no_seed {
            sink.seed_registry(&mut registry).await?;
        }
    }

    let batch = args.source.batch(registry)?;
    print_summary(&batch);

    match sink.as_mut() {
        Some(_) if batch.is_empty() => {
            println!("\n{}", "No new records, nothing written to the database".yellow())
        }
        Some(sink) => {
            let report = sink.deliver(&batch).await?;
            print_delivery(&sink.describe(), &report);
        }
        None => println!("\n{}", "Dry run: nothing written to the database".yellow()),
    }

    print_issues(&batch.issues);
    write_issues(args.source.import.issues.as_deref(), &batch.issues)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::{ImportArgs, SourceArgs};
    use crate::import::excel::cells::HEADERS;
    use crate::store::DocumentStore;
    use rust_xlsxwriter::Workbook;
    use std::path::Path;

    fn write_workbook(path: &Path, hosts: &str) {
        write_software_workbook(path, "WidgetCtrl", hosts);
    }

    fn write_software_workbook(path: &Path, software: &str, hosts: &str) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in HEADERS.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        let install = format!("{}-ioc", software.to_lowercase());
        let row = [install.as_str(), "IOC", software, hosts, "devel", "2"];
        for (col, value) in row.iter().enumerate() {
            sheet.write_string(1, col as u16, *value).unwrap();
        }
        workbook.save(path).unwrap();
    }

    fn args(workbook: &Path, database_url: &str, dry_run: bool) -> LoadCommands {
        LoadCommands {
            source: SourceArgs {
                workbook: Some(workbook.to_path_buf()),
                import: ImportArgs::default(),
                from_json: None,
            },
            database_url: Some(database_url.to_string()),
            no_seed: false,
            dry_run,
        }
    }

    #[tokio::test]
    async fn test_second_load_skips_existing_records() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("swdb.db").display());

        let first = dir.path().join("first.xlsx");
        write_workbook(&first, "ioc1");
        handle_load_command(args(&first, &url, false), &Config::default())
            .await
            .unwrap();

        // Same software, one known host and one new host
        let second = dir.path().join("second.xlsx");
        write_workbook(&second, "ioc1,ioc2");
        handle_load_command(args(&second, &url, false), &Config::default())
            .await
            .unwrap();

        let db = store::open(&url).await.unwrap();
        assert_eq!(db.count("softwares").await.unwrap(), 1);
        assert_eq!(db.count("swinstalls").await.unwrap(), 2);

        let installs = db.find_all("swinstalls").await.unwrap();
        assert_eq!(installs[0]["software"], installs[1]["software"]);
    }

    #[tokio::test]
    async fn test_loads_of_different_workbooks_keep_references() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("swdb.db").display());

        // Both software records sit on the first data row
        let alpha = dir.path().join("alpha.xlsx");
        write_software_workbook(&alpha, "Alpha", "ioc1");
        handle_load_command(args(&alpha, &url, false), &Config::default())
            .await
            .unwrap();
        let beta = dir.path().join("beta.xlsx");
        write_software_workbook(&beta, "Beta", "ioc2");
        handle_load_command(args(&beta, &url, false), &Config::default())
            .await
            .unwrap();

        let db = store::open(&url).await.unwrap();
        let software = db.find_all("softwares").await.unwrap();
        assert_eq!(software.len(), 2);
        assert_ne!(software[0]["_id"], software[1]["_id"]);

        for install in db.find_all("swinstalls").await.unwrap() {
            let owner = software
                .iter()
                .find(|sw| sw["_id"] == install["software"])
                .unwrap();
            let expected = format!("{}-ioc", owner["swName"].as_str().unwrap().to_lowercase());
            assert_eq!(install["name"], expected.as_str());
        }
        assert_eq!(db.count("swinstalls").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("swdb.db");
        let workbook = dir.path().join("config.xlsx");
        write_workbook(&workbook, "ioc1");

        let url = format!("sqlite://{}", db_path.display());
        handle_load_command(args(&workbook, &url, true), &Config::default())
            .await
            .unwrap();
        assert!(!db_path.exists());
    }

    #[tokio::test]
    async fn test_missing_database_url() {
        let dir = tempfile::tempdir().unwrap();
        let workbook = dir.path().join("config.xlsx");
        write_workbook(&workbook, "ioc1");

        let mut load = args(&workbook, "", false);
        load.database_url = None;
        let err = handle_load_command(load, &Config::default()).await.unwrap_err();
        assert!(err.to_string().contains("No database connection string"));
    }
}
