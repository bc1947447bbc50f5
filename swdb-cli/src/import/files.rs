//! JSON files holding converted record collections

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Write records as a pretty-printed (2-space) JSON array
pub fn write_records_json<T: Serialize, P: AsRef<Path>>(path: P, records: &[T]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(records).context("Failed to serialize records")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write output to: {}", path.display()))?;
    Ok(())
}

/// Read a JSON array of records written by [`write_records_json`]
pub fn read_records_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Vec<T>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse records file: {}", path.display()))
}
