//! Output of one conversion run

use serde::{Deserialize, Serialize};

use super::{InstallationRecord, Issue, SoftwareRecord};

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub sheets: usize,
    pub rows_read: usize,
    /// Rows without an installation name
    pub rows_skipped: usize,
    pub software_created: usize,
    pub software_skipped: usize,
    pub installs_created: usize,
    pub installs_skipped: usize,
}

/// Records and issues assembled from a workbook (or loaded from JSON files)
#[derive(Debug, Clone, Default)]
pub struct ImportBatch {
    pub software: Vec<SoftwareRecord>,
    pub installations: Vec<InstallationRecord>,
    pub issues: Vec<Issue>,
    pub summary: RunSummary,
}

impl ImportBatch {
    /// Build a batch from already converted records
    pub fn from_records(
        software: Vec<SoftwareRecord>,
        installations: Vec<InstallationRecord>,
    ) -> Self {
        let summary = RunSummary {
            software_created: software.len(),
            installs_created: installations.len(),
            ..RunSummary::default()
        };
        Self {
            software,
            installations,
            issues: Vec::new(),
            summary,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.software.is_empty() && self.installations.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.software.len() + self.installations.len()
    }
}
