use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;

use super::RecordSink;
use crate::api::{Collection, DeliveryReport, DeliveryResult};
use crate::import::types::ImportBatch;
use crate::import::write_records_json;

/// Writes the two collections as pretty-printed JSON arrays
pub struct JsonFileSink {
    software_path: PathBuf,
    install_path: PathBuf,
}

impl JsonFileSink {
    pub fn new(software_path: impl Into<PathBuf>, install_path: impl Into<PathBuf>) -> Self {
        Self {
            software_path: software_path.into(),
            install_path: install_path.into(),
        }
    }
}

#[async_trait]
impl RecordSink for JsonFileSink {
    fn describe(&self) -> String {
        format!(
            "JSON files {} and {}",
            self.software_path.display(),
            self.install_path.display()
        )
    }

    async fn deliver(&mut self, batch: &ImportBatch) -> Result<DeliveryReport> {
        write_records_json(&self.software_path, &batch.software)?;
        log::info!(
            "Wrote {} software records to {}",
            batch.software.len(),
            self.software_path.display()
        );
        write_records_json(&self.install_path, &batch.installations)?;
        log::info!(
            "Wrote {} installation records to {}",
            batch.installations.len(),
            self.install_path.display()
        );

        let mut report = DeliveryReport::new();
        for record in &batch.software {
            report.push(DeliveryResult::success(Collection::Software, record.key()));
        }
        for record in &batch.installations {
            report.push(DeliveryResult::success(Collection::Installation, record.key()));
        }
        Ok(report)
    }
}
