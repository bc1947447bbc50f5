pub mod convert;
pub mod load;
pub mod push;
pub mod template;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use crate::import::excel::{SheetSelection, read_workbook};
use crate::import::types::{ImportBatch, InstallationRecord, SoftwareRecord};
use crate::import::{BackfillPolicy, ImportOptions, ImportRun, KeyRegistry, read_records_json};

/// Import options shared by every command that reads a spreadsheet
#[derive(Args, Debug, Clone, Default)]
pub struct ImportArgs {
    /// Read only this sheet (0-based index); default is every sheet
    #[arg(short, long)]
    pub sheet: Option<usize>,

    /// When an installation date is copied onto its software record
    #[arg(long, value_enum, default_value_t = BackfillPolicy::SameRow)]
    pub backfill: BackfillPolicy,

    /// Also write the issue list as JSON to this file
    #[arg(long)]
    pub issues: Option<PathBuf>,
}

impl ImportArgs {
    pub fn selection(&self) -> SheetSelection {
        match self.sheet {
            Some(index) => SheetSelection::Index(index),
            None => SheetSelection::All,
        }
    }

    pub fn options(&self) -> ImportOptions {
        ImportOptions {
            backfill: self.backfill,
        }
    }

    /// Read `workbook` and assemble records, starting from `registry`
    pub fn assemble(&self, workbook: &Path, registry: KeyRegistry) -> Result<ImportBatch> {
        if !workbook.exists() {
            anyhow::bail!("Workbook does not exist: {}", workbook.display());
        }

        let sheets = read_workbook(workbook, self.selection())?;
        log::info!("Read {} sheet(s) from {}", sheets.len(), workbook.display());

        let mut run = ImportRun::with_registry(self.options(), registry);
        run.process_sheets(&sheets);
        Ok(run.finish())
    }
}

/// A workbook to convert
#[derive(Args, Debug, Clone)]
pub struct WorkbookArgs {
    /// Workbook to read (.xlsx, .xls or .ods)
    pub workbook: PathBuf,

    #[command(flatten)]
    pub import: ImportArgs,
}

impl WorkbookArgs {
    pub fn assemble(&self, registry: KeyRegistry) -> Result<ImportBatch> {
        self.import.assemble(&self.workbook, registry)
    }
}

/// Records to deliver: a workbook, or JSON files written by `convert`
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Workbook to read (.xlsx, .xls or .ods)
    #[arg(required_unless_present = "from_json", conflicts_with = "from_json")]
    pub workbook: Option<PathBuf>,

    #[command(flatten)]
    pub import: ImportArgs,

    /// Deliver previously converted files instead of reading a workbook
    #[arg(long, num_args = 2, value_names = ["SOFTWARE_JSON", "INSTALL_JSON"])]
    pub from_json: Option<Vec<PathBuf>>,
}

impl SourceArgs {
    /// Build the batch to deliver; `registry` only applies to workbooks
    pub fn batch(&self, registry: KeyRegistry) -> Result<ImportBatch> {
        if let Some(workbook) = &self.workbook {
            return self.import.assemble(workbook, registry);
        }

        match self.from_json.as_deref() {
            Some([software_path, install_path]) => {
                let software: Vec<SoftwareRecord> = read_records_json(software_path)?;
                let installations: Vec<InstallationRecord> = read_records_json(install_path)?;
                log::info!(
                    "Loaded {} software and {} installation records from JSON",
                    software.len(),
                    installations.len()
                );
                Ok(ImportBatch::from_records(software, installations))
            }
            _ => anyhow::bail!(
                "Either provide a workbook or use --from-json SOFTWARE_JSON INSTALL_JSON"
            ),
        }
    }
}
