//! Output records produced from workbook rows

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::date::us_date;
use super::vocabulary::{Area, InstallStatus, LevelOfCare, SoftwareStatus, VersionControl};

/// Identifier of a software record
///
/// Generated ids are the row counter as 24 hex digits, the same width as a
/// document database object id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_row_counter(counter: u64) -> Self {
        Self(format!("{:024x}", counter))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One software package at one version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareRecord {
    pub sw_name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SoftwareStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "us_date")]
    pub status_date: Option<NaiveDate>,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Area>,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub engineer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_of_care: Option<LevelOfCare>,
    #[serde(default)]
    pub platforms: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_control: Option<VersionControl>,
    #[serde(default)]
    pub version_control_loc: String,
    #[serde(rename = "_id")]
    pub id: RecordId,
}

impl SoftwareRecord {
    /// Composite key used for duplicate detection
    pub fn key(&self) -> String {
        software_key(&self.sw_name, &self.version)
    }
}

/// One installation of a software record on one host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationRecord {
    pub host: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Area>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InstallStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "us_date")]
    pub status_date: Option<NaiveDate>,
    #[serde(default)]
    pub vv_results_loc: String,
    /// Owning software record
    pub software: RecordId,
    /// Worksheet (DRR) the installation was listed on
    #[serde(default)]
    pub drrs: String,
}

impl InstallationRecord {
    pub fn key(&self) -> String {
        install_key(&self.host, &self.name, &self.software)
    }
}

/// `name-version`, no normalization
pub fn software_key(name: &str, version: &str) -> String {
    format!("{}-{}", name, version)
}

/// `host-name-softwareId`, no normalization
pub fn install_key(host: &str, name: &str, software: &RecordId) -> String {
    format!("{}-{}-{}", host, name, software)
}
