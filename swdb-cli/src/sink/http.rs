use std::collections::{HashMap, HashSet};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use super::RecordSink;
use crate::api::bodies::{install_body, software_body};
use crate::api::{Collection, DeliveryReport, DeliveryResult, SwdbClient};
use crate::import::types::{ImportBatch, RecordId};

/// Posts records one by one to the web API
///
/// Software goes first so installations can point at the ids the server
/// assigned.
pub struct HttpSink {
    client: SwdbClient,
    username: String,
    password: String,
}

impl HttpSink {
    pub fn new(
        client: SwdbClient,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client,
            username: username.into(),
            password: password.into(),
        }
    }

    async fn post(&self, collection: Collection, key: String, body: &Value) -> DeliveryResult {
        let response = match self.client.post_json(collection.api_path(), body).await {
            Ok(response) => response,
            Err(err) => {
                log::error!("{:#}\n  payload: {}", err, body);
                return DeliveryResult::failure(collection, key, format!("{:#}", err), None);
            }
        };

        if response.is_success() {
            DeliveryResult::success(collection, key)
                .with_status(response.status)
                .with_assigned_id(response.location_id())
        } else {
            log::error!(
                "POST {} for {} returned HTTP {}\n  payload: {}\n  response: {}",
                collection.api_path(),
                key,
                response.status,
                body,
                response.body
            );
            DeliveryResult::failure(collection, key, response.body, Some(response.status))
        }
    }
}

#[async_trait]
impl RecordSink for HttpSink {
    fn describe(&self) -> String {
        format!("web API at {}", self.client.api_url())
    }

    async fn deliver(&mut self, batch: &ImportBatch) -> Result<DeliveryReport> {
        self.client.login(&self.username, &self.password).await?;

        let mut report = DeliveryReport::new();
        let mut server_ids: HashMap<RecordId, RecordId> = HashMap::new();
        let mut rejected: HashSet<&RecordId> = HashSet::new();

        for record in &batch.software {
            let body = software_body(record)?;
            let result = self.post(Collection::Software, record.key(), &body).await;
            if result.is_error() {
                rejected.insert(&record.id);
            } else if let Some(assigned) = &result.assigned_id {
                log::debug!("Software {} stored as {}", record.id, assigned);
                server_ids.insert(record.id.clone(), RecordId::new(assigned.clone()));
            }
            report.push(result);
        }

        for record in &batch.installations {
            if rejected.contains(&record.software) && !server_ids.contains_key(&record.software) {
                log::warn!(
                    "Not posting installation {}: software {} was rejected",
                    record.key(),
                    record.software
                );
                report.push(DeliveryResult::failure(
                    Collection::Installation,
                    record.key(),
                    format!("software {} was rejected", record.software),
                    None,
                ));
                continue;
            }

            // Without a Location header the local id is sent as-is
            let software = server_ids.get(&record.software).unwrap_or(&record.software);
            let body = install_body(record, software)?;
            let result = self.post(Collection::Installation, record.key(), &body).await;
            report.push(result);
        }

        log::info!(
            "Posted {} software and {} installation records ({} failed)",
            report.succeeded(Collection::Software),
            report.succeeded(Collection::Installation),
            report.failed()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::types::{InstallationRecord, SoftwareRecord};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn software(name: &str, counter: u64) -> SoftwareRecord {
        SoftwareRecord {
            sw_name: name.into(),
            desc: String::new(),
            status: None,
            status_date: None,
            version: "1".into(),
            area: None,
            owner: String::new(),
            engineer: String::new(),
            level_of_care: None,
            platforms: String::new(),
            version_control: None,
            version_control_loc: String::new(),
            id: RecordId::from_row_counter(counter),
        }
    }

    fn install(host: &str, software: &SoftwareRecord) -> InstallationRecord {
        InstallationRecord {
            host: host.into(),
            name: "ioc".into(),
            area: None,
            status: None,
            status_date: None,
            vv_results_loc: String::new(),
            software: software.id.clone(),
            drrs: "DRR01".into(),
        }
    }

    async fn server_with_login() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/testlogin"))
            .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "sid=abc; Path=/"))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    fn sink(server: &MockServer) -> HttpSink {
        let client = SwdbClient::new(&server.uri(), &server.uri(), None).unwrap();
        HttpSink::new(client, "testuser", "secret")
    }

    #[tokio::test]
    async fn test_installations_use_server_ids() {
        let server = server_with_login().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/swdb"))
            .respond_with(ResponseTemplate::new(201).insert_header(
                "Location",
                format!("{}/api/v1/swdb/srv-1", server.uri()).as_str(),
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/inst"))
            .and(body_partial_json(json!({"software": "srv-1"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(2)
            .mount(&server)
            .await;

        let widget = software("widget", 1);
        let batch = ImportBatch::from_records(
            vec![widget.clone()],
            vec![install("ioc1", &widget), install("ioc2", &widget)],
        );

        let report = sink(&server).deliver(&batch).await.unwrap();
        assert!(report.is_clean());
        assert_eq!(report.results()[0].assigned_id.as_deref(), Some("srv-1"));
        assert_eq!(report.succeeded(Collection::Installation), 2);
    }

    #[tokio::test]
    async fn test_rejected_record_does_not_stop_run() {
        let server = server_with_login().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/swdb"))
            .and(body_partial_json(json!({"swName": "broken"})))
            .respond_with(ResponseTemplate::new(400).set_body_string("validation failed"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/swdb"))
            .and(body_partial_json(json!({"swName": "widget"})))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/inst"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let broken = software("broken", 1);
        let widget = software("widget", 2);
        let batch = ImportBatch::from_records(
            vec![broken.clone(), widget.clone()],
            vec![install("ioc1", &widget)],
        );

        let report = sink(&server).deliver(&batch).await.unwrap();
        assert_eq!(report.failed(), 1);
        let failure = report.failures().next().unwrap();
        assert_eq!(failure.record, "broken-1");
        assert_eq!(failure.status_code, Some(400));
        assert_eq!(failure.error.as_deref(), Some("validation failed"));
        assert_eq!(report.succeeded(Collection::Software), 1);
        assert_eq!(report.succeeded(Collection::Installation), 1);
    }

    #[tokio::test]
    async fn test_local_id_kept_without_location() {
        let server = server_with_login().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/swdb"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/inst"))
            .and(body_partial_json(json!({"software": "000000000000000000000003"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let widget = software("widget", 3);
        let batch = ImportBatch::from_records(vec![widget.clone()], vec![install("ioc1", &widget)]);

        let report = sink(&server).deliver(&batch).await.unwrap();
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn test_login_failure_aborts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/testlogin"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let widget = software("widget", 1);
        let batch = ImportBatch::from_records(vec![widget], Vec::new());
        assert!(sink(&server).deliver(&batch).await.is_err());
    }

    #[tokio::test]
    async fn test_installations_of_rejected_software_not_posted() {
        let server = server_with_login().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/swdb"))
            .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/inst"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let widget = software("widget", 1);
        let batch = ImportBatch::from_records(
            vec![widget.clone()],
            vec![install("ioc1", &widget), install("ioc2", &widget)],
        );

        let report = sink(&server).deliver(&batch).await.unwrap();
        assert_eq!(report.failed(), 3);
        assert_eq!(report.succeeded(Collection::Installation), 0);
        let skipped: Vec<_> = report
            .failures()
            .filter(|r| r.collection == Collection::Installation)
            .collect();
        assert_eq!(skipped.len(), 2);
        assert!(skipped.iter().all(|r| r.status_code.is_none()));
    }
}
