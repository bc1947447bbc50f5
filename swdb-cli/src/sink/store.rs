use std::collections::HashSet;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::RecordSink;
use crate::api::{Collection, DeliveryReport, DeliveryResult};
use crate::import::KeyRegistry;
use crate::import::types::{ImportBatch, RecordId, install_key, software_key};
use crate::store::DocumentStore;

/// Inserts records into the `softwares` and `swinstalls` collections
pub struct DocumentStoreSink {
    store: Box<dyn DocumentStore>,
}

impl DocumentStoreSink {
    pub fn new(store: Box<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Register the keys of documents already in the store
    ///
    /// Returns the number of software and installation keys seeded.
    pub async fn seed_registry(&self, registry: &mut KeyRegistry) -> Result<(usize, usize)> {
        let mut software = 0;
        for doc in self.store.find_all(Collection::Software.name()).await? {
            let id = str_field(&doc, "_id");
            match (str_field(&doc, "swName"), str_field(&doc, "version"), id) {
                (Some(name), version, Some(id)) => {
                    let key = software_key(name, version.unwrap_or(""));
                    registry.seed_software(key, RecordId::new(id));
                    software += 1;
                }
                _ => log::debug!("Ignoring stored software without swName or _id: {}", doc),
            }
        }

        let mut installs = 0;
        for doc in self.store.find_all(Collection::Installation.name()).await? {
            let software_id = str_field(&doc, "software");
            match (str_field(&doc, "host"), str_field(&doc, "name"), software_id) {
                (Some(host), Some(name), Some(sw)) => {
                    registry.seed_install(install_key(host, name, &RecordId::new(sw)));
                    installs += 1;
                }
                _ => log::debug!("Ignoring incomplete stored installation: {}", doc),
            }
        }

        log::info!(
            "Seeded {} software and {} installation keys from database '{}'",
            software,
            installs,
            self.store.database()
        );
        Ok((software, installs))
    }

    async fn insert_record<T: Serialize + Sync>(
        &self,
        collection: Collection,
        key: String,
        doc_id: Option<&str>,
        record: &T,
    ) -> Result<DeliveryResult> {
        let body = serde_json::to_value(record)
            .with_context(|| format!("Failed to serialize {} record {}", collection, key))?;

        match self.store.insert(collection.name(), doc_id, &body).await {
            Ok(()) => Ok(DeliveryResult::success(collection, key)),
            Err(err) => {
                log::error!("Insert into {} failed: {:#}\n  payload: {}", collection, err, body);
                Ok(DeliveryResult::failure(collection, key, format!("{:#}", err), None))
            }
        }
    }
}

fn str_field<'a>(doc: &'a Value, field: &str) -> Option<&'a str> {
    doc.get(field).and_then(Value::as_str)
}

#[async_trait]
impl RecordSink for DocumentStoreSink {
    fn describe(&self) -> String {
        format!("document database '{}'", self.store.database())
    }

    async fn deliver(&mut self, batch: &ImportBatch) -> Result<DeliveryReport> {
        let mut report = DeliveryReport::new();
        let mut stored: HashSet<&RecordId> = HashSet::new();

        for record in &batch.software {
            let doc_id = Some(record.id.as_str());
            let result = self
                .insert_record(Collection::Software, record.key(), doc_id, record)
                .await?;
            if !result.is_error() {
                stored.insert(&record.id);
            }
            report.push(result);
        }

        // Installations must not point at software this batch failed to store
        let created: HashSet<&RecordId> = batch.software.iter().map(|s| &s.id).collect();
        for record in &batch.installations {
            if created.contains(&record.software) && !stored.contains(&record.software) {
                log::warn!(
                    "Skipping installation {}: software {} was not stored",
                    record.key(),
                    record.software
                );
                report.push(DeliveryResult::failure(
                    Collection::Installation,
                    record.key(),
                    format!("software {} was not stored", record.software),
                    None,
                ));
                continue;
            }
            let result = self
                .insert_record(Collection::Installation, record.key(), None, record)
                .await?;
            report.push(result);
        }

        log::info!(
            "Inserted {} software and {} installation documents into '{}' ({} failed)",
            report.succeeded(Collection::Software),
            report.succeeded(Collection::Installation),
            self.store.database(),
            report.failed()
        );
        if log::log_enabled!(log::Level::Debug) {
            let software = self.store.count(Collection::Software.name()).await?;
            let installs = self.store.count(Collection::Installation.name()).await?;
            log::debug!(
                "Database '{}' now holds {} software and {} installation documents",
                self.store.database(),
                software,
                installs
            );
        }
        Ok(report)
    }
}
