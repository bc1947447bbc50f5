//! Per-record delivery outcomes

use serde::{Deserialize, Serialize};

/// Target collection of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Software,
    Installation,
}

impl Collection {
    /// Document database collection name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Software => "softwares",
            Self::Installation => "swinstalls",
        }
    }

    /// REST path accepting new records
    pub fn api_path(&self) -> &'static str {
        match self {
            Self::Software => "/api/v1/swdb",
            Self::Installation => "/api/v1/inst",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of delivering one record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryResult {
    pub collection: Collection,
    /// Composite key of the record
    pub record: String,
    pub success: bool,
    pub error: Option<String>,
    /// HTTP status code, when the target is the web API
    pub status_code: Option<u16>,
    /// Id the target assigned, if it differs from ours
    pub assigned_id: Option<String>,
}

impl DeliveryResult {
    pub fn success(collection: Collection, record: impl Into<String>) -> Self {
        Self {
            collection,
            record: record.into(),
            success: true,
            error: None,
            status_code: None,
            assigned_id: None,
        }
    }

    pub fn failure(
        collection: Collection,
        record: impl Into<String>,
        error: impl Into<String>,
        status_code: Option<u16>,
    ) -> Self {
        Self {
            collection,
            record: record.into(),
            success: false,
            error: Some(error.into()),
            status_code,
            assigned_id: None,
        }
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_assigned_id(mut self, id: Option<String>) -> Self {
        self.assigned_id = id;
        self
    }

    pub fn is_error(&self) -> bool {
        !self.success
    }
}

/// Everything a sink did with one batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryReport {
    results: Vec<DeliveryResult>,
}

impl DeliveryReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: DeliveryResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[DeliveryResult] {
        &self.results
    }

    pub fn succeeded(&self, collection: Collection) -> usize {
        self.results
            .iter()
            .filter(|r| r.collection == collection && r.success)
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeliveryResult> {
        self.results.iter().filter(|r| r.is_error())
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }
}
