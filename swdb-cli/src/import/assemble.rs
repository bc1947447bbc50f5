//! Assemble software and installation records from workbook rows
//!
//! An [`ImportRun`] owns everything scoped to one conversion: the key
//! registry, the issue list and the row counter that ids are derived from.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::excel::cells::{cols, get_cell_date, get_cell_string};
use super::excel::{RawRow, SheetRows};
use super::normalize::{Normalizer, RowContext};
use super::registry::{KeyRegistry, SoftwareClaim};
use super::types::{
    Area, Field, ImportBatch, InstallStatus, InstallationRecord, LevelOfCare, RecordId,
    RunSummary, SoftwareRecord, SoftwareStatus, VersionControl, install_key, software_key,
};

/// When an installation's verification date is copied onto its software record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BackfillPolicy {
    /// Never touch the software status date
    Never,
    /// Only when the software record was created by the same row
    #[default]
    SameRow,
    /// Any row referencing the software record overwrites the date
    AnyRow,
}

/// Options controlling record assembly
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub backfill: BackfillPolicy,
}

/// State of one conversion run
#[derive(Debug, Default)]
pub struct ImportRun {
    options: ImportOptions,
    registry: KeyRegistry,
    normalizer: Normalizer,
    row_counter: u64,
    software: Vec<SoftwareRecord>,
    /// Position of each software record created in this run
    software_index: HashMap<RecordId, usize>,
    installations: Vec<InstallationRecord>,
    summary: RunSummary,
}

impl ImportRun {
    pub fn new(options: ImportOptions) -> Self {
        Self::with_registry(options, KeyRegistry::new())
    }

    /// Start a run with keys that already exist in the target
    pub fn with_registry(options: ImportOptions, registry: KeyRegistry) -> Self {
        Self {
            options,
            registry,
            ..Self::default()
        }
    }

    pub fn process_sheets(&mut self, sheets: &[SheetRows]) {
        for sheet in sheets {
            self.process_sheet(sheet);
        }
    }

    pub fn process_sheet(&mut self, sheet: &SheetRows) {
        log::info!("Processing sheet {} ({} rows)", sheet.name, sheet.rows.len());
        self.summary.sheets += 1;
        for row in &sheet.rows {
            self.process_row(&sheet.name, row);
        }
    }

    /// Process one data row of sheet `sheet`
    pub fn process_row(&mut self, sheet: &str, row: &RawRow) {
        // Every data row advances the counter, including skipped ones
        self.row_counter += 1;
        self.summary.rows_read += 1;

        let cells = row.cells.as_slice();
        let ctx = RowContext {
            sheet,
            row_number: row.row_number,
            cells,
        };

        let install_name = get_cell_string(cells, cols::INSTALL_NAME);
        if install_name.is_empty() {
            log::debug!("{} row {}: no installation name, skipping", sheet, row.row_number);
            self.summary.rows_skipped += 1;
            return;
        }

        let software_name = get_cell_string(cells, cols::SOFTWARE_NAME);
        let version = get_cell_string(cells, cols::VERSION);
        let key = software_key(&software_name, &version);

        let claim = self.registry.claim_software(&key, self.row_counter);

        if claim.is_new() {
            let record = self.build_software(claim.id().clone(), software_name, version, &ctx);
            log::info!(
                "{} row {}: adding software {} ({})",
                sheet,
                row.row_number,
                key,
                record.id
            );
            self.software_index.insert(record.id.clone(), self.software.len());
            self.software.push(record);
            self.summary.software_created += 1;
        } else {
            log::info!(
                "Found existing software {} version {}, skipping add",
                software_name,
                version
            );
            self.summary.software_skipped += 1;
        }

        // Read once the row actually yields an installation
        let mut verification_date: Option<Option<NaiveDate>> = None;

        let hosts = get_cell_string(cells, cols::HOSTS);
        for host in hosts.split(',').map(str::trim).filter(|h| !h.is_empty()) {
            let inst_key = install_key(host, &install_name, claim.id());
            if !self.registry.claim_install(&inst_key) {
                log::info!("Found existing installation {}, skipping add", inst_key);
                self.summary.installs_skipped += 1;
                continue;
            }

            let status_date = match verification_date {
                Some(date) => date,
                None => *verification_date.insert(self.verification_date(&ctx)),
            };

            let record = InstallationRecord {
                host: host.to_string(),
                name: install_name.clone(),
                area: self
                    .normalizer
                    .normalize::<Area>(&get_cell_string(cells, cols::AREA), &ctx),
                status: self
                    .normalizer
                    .normalize::<InstallStatus>(&get_cell_string(cells, cols::STATUS), &ctx),
                status_date,
                vv_results_loc: get_cell_string(cells, cols::VV_RESULTS),
                software: claim.id().clone(),
                drrs: sheet.to_string(),
            };
            log::info!("{} row {}: adding installation {}", sheet, row.row_number, inst_key);
            self.installations.push(record);
            self.summary.installs_created += 1;

            if let Some(date) = status_date {
                self.backfill_status_date(&claim, date);
            }
        }
    }

    /// Verification date of the row; an unreadable cell becomes an issue
    fn verification_date(&mut self, ctx: &RowContext<'_>) -> Option<NaiveDate> {
        match get_cell_date(ctx.cells, cols::VV_DATE) {
            Ok(date) => date,
            Err(err) => {
                log::debug!("{} row {}: {}", ctx.sheet, ctx.row_number, err);
                self.normalizer.report(Field::VerificationDate, &err.raw, ctx);
                None
            }
        }
    }

    fn build_software(
        &mut self,
        id: RecordId,
        sw_name: String,
        version: String,
        ctx: &RowContext<'_>,
    ) -> SoftwareRecord {
        let cells = ctx.cells;
        let n = &mut self.normalizer;
        SoftwareRecord {
            sw_name,
            desc: get_cell_string(cells, cols::DESCRIPTION),
            status: n.normalize::<SoftwareStatus>(&get_cell_string(cells, cols::STATUS), ctx),
            // Set from installation verification dates
            status_date: None,
            version,
            area: n.normalize::<Area>(&get_cell_string(cells, cols::AREA), ctx),
            owner: get_cell_string(cells, cols::OWNER),
            engineer: get_cell_string(cells, cols::ENGINEER),
            level_of_care: n
                .normalize::<LevelOfCare>(&get_cell_string(cells, cols::LEVEL_OF_CARE), ctx),
            platforms: get_cell_string(cells, cols::PLATFORMS),
            version_control: n
                .normalize::<VersionControl>(&get_cell_string(cells, cols::VCS_TYPE), ctx),
            version_control_loc: get_cell_string(cells, cols::VCS_LOCATION),
            id,
        }
    }

    fn backfill_status_date(&mut self, claim: &SoftwareClaim, date: NaiveDate) {
        let allowed = match self.options.backfill {
            BackfillPolicy::Never => false,
            BackfillPolicy::SameRow => claim.is_new(),
            BackfillPolicy::AnyRow => true,
        };
        if !allowed {
            return;
        }

        match self.software_index.get(claim.id()) {
            Some(&idx) => {
                let record = &mut self.software[idx];
                if record.status_date.is_some_and(|d| d != date) {
                    log::debug!(
                        "Status date of {} changed from {:?} to {}",
                        record.id,
                        record.status_date,
                        date
                    );
                }
                record.status_date = Some(date);
            }
            // Seeded from the target, nothing to update locally
            None => log::debug!(
                "Software {} not created in this run, date not backfilled",
                claim.id()
            ),
        }
    }

    pub fn finish(self) -> ImportBatch {
        ImportBatch {
            software: self.software,
            installations: self.installations,
            issues: self.normalizer.into_issues(),
            summary: self.summary,
        }
    }
}

#[cfg(test)]
impl ImportRun {
    pub fn software(&self) -> &[SoftwareRecord] {
        &self.software
    }

    pub fn installations(&self) -> &[InstallationRecord] {
        &self.installations
    }

    pub fn issues(&self) -> &[super::types::Issue] {
        self.normalizer.issues()
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }
}
