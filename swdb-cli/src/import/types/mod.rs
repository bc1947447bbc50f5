//! Record, vocabulary and issue types

mod batch;
pub mod date;
mod issue;
mod record;
mod vocabulary;

pub use batch::{ImportBatch, RunSummary};
pub use issue::{Field, Issue};
pub use record::{InstallationRecord, RecordId, SoftwareRecord, install_key, software_key};
pub use vocabulary::{
    Area, InstallStatus, LevelOfCare, SoftwareStatus, VersionControl, Vocabulary,
};
