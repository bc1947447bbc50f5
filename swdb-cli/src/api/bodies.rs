//! Request bodies for record POSTs

use anyhow::{Context, Result};
use serde_json::Value;

use crate::import::types::{InstallationRecord, RecordId, SoftwareRecord};

/// Software body without the local `_id`; the server assigns its own
pub fn software_body(record: &SoftwareRecord) -> Result<Value> {
    let mut body = serde_json::to_value(record)
        .with_context(|| format!("Failed to serialize software {}", record.key()))?;
    if let Value::Object(map) = &mut body {
        map.remove("_id");
    }
    Ok(body)
}

/// Installation body pointing at `software`
pub fn install_body(record: &InstallationRecord, software: &RecordId) -> Result<Value> {
    let mut body = serde_json::to_value(record)
        .with_context(|| format!("Failed to serialize installation {}", record.key()))?;
    if let Value::Object(map) = &mut body {
        map.insert("software".to_string(), Value::String(software.to_string()));
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::types::{InstallStatus, SoftwareStatus};

    fn software() -> SoftwareRecord {
        SoftwareRecord {
            sw_name: "WidgetCtrl".into(),
            desc: String::new(),
            status: Some(SoftwareStatus::Devel),
            status_date: None,
            version: "2".into(),
            area: None,
            owner: String::new(),
            engineer: String::new(),
            level_of_care: None,
            platforms: String::new(),
            version_control: None,
            version_control_loc: String::new(),
            id: RecordId::from_row_counter(1),
        }
    }

    #[test]
    fn test_software_body_drops_local_id() {
        let body = software_body(&software()).unwrap();
        assert!(body.get("_id").is_none());
        assert_eq!(body["swName"], "WidgetCtrl");
        assert_eq!(body["status"], "DEVEL");
        assert!(body.get("area").is_none());
    }

    #[test]
    fn test_install_body_uses_given_software_id() {
        let record = InstallationRecord {
            host: "ioc1".into(),
            name: "widget-ioc".into(),
            area: None,
            status: Some(InstallStatus::Maint),
            status_date: None,
            vv_results_loc: String::new(),
            software: RecordId::from_row_counter(1),
            drrs: "DRR01".into(),
        };
        let body = install_body(&record, &RecordId::new("server-id")).unwrap();
        assert_eq!(body["software"], "server-id");
        assert_eq!(body["host"], "ioc1");
        assert_eq!(body["drrs"], "DRR01");
    }
}
