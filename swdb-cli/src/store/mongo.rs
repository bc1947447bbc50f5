//! Collections on a MongoDB server

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::options::{ClientOptions, Tls, TlsOptions};
use mongodb::{Client, Database};
use serde_json::Value;

use super::DocumentStore;
use super::connection::ConnectionTarget;

/// Fields holding software ids; string ids stay strings, object ids become hex
const ID_FIELDS: [&str; 2] = ["_id", "software"];

pub struct MongoStore {
    db: Database,
    database: String,
}

impl MongoStore {
    /// Connect to `target` and check the server answers
    pub async fn open(target: &ConnectionTarget) -> Result<Self> {
        if !target.is_mongodb() {
            bail!("Not a MongoDB connection string: {}", target.connect_url);
        }

        let client = Client::with_options(client_options(target).await?)
            .with_context(|| format!("Failed to create client for {}", target.connect_url))?;
        let db = client.database(&target.database);
        db.run_command(doc! { "ping": 1 })
            .await
            .with_context(|| format!("Failed to connect to {}", target.connect_url))?;

        log::info!(
            "Connected to MongoDB {} (database '{}')",
            target.connect_url,
            target.database
        );
        Ok(Self {
            db,
            database: target.database.clone(),
        })
    }
}

/// Driver options with the TLS switches stripped from the URL applied
async fn client_options(target: &ConnectionTarget) -> Result<ClientOptions> {
    let mut options = ClientOptions::parse(target.connect_url.as_str())
        .await
        .with_context(|| format!("Invalid connection string: {}", target.connect_url))?;

    if target.tls {
        let mut tls = TlsOptions::default();
        if target.tls_insecure {
            tls.allow_invalid_certificates = Some(true);
        }
        options.tls = Some(Tls::Enabled(tls));
    }
    Ok(options)
}

fn to_document(body: &Value) -> Result<Document> {
    bson::to_document(body).context("Failed to convert document to BSON")
}

fn to_json(mut doc: Document) -> Value {
    for field in ID_FIELDS {
        if let Ok(oid) = doc.get_object_id(field) {
            doc.insert(field, oid.to_hex());
        }
    }
    Bson::Document(doc).into_relaxed_extjson()
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn database(&self) -> &str {
        &self.database
    }

    /// `doc_id` is already the body's `_id`; without one the server assigns it
    async fn insert(&self, collection: &str, doc_id: Option<&str>, body: &Value) -> Result<()> {
        let doc = to_document(body)?;
        self.db
            .collection::<Document>(collection)
            .insert_one(doc)
            .await
            .with_context(|| match doc_id {
                Some(id) => format!("Failed to insert document {} into {}", id, collection),
                None => format!("Failed to insert document into {}", collection),
            })?;
        Ok(())
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Value>> {
        let mut cursor = self
            .db
            .collection::<Document>(collection)
            .find(doc! {})
            .await
            .with_context(|| format!("Failed to read collection {}", collection))?;

        let mut docs = Vec::new();
        while cursor
            .advance()
            .await
            .with_context(|| format!("Failed to read collection {}", collection))?
        {
            let doc = cursor
                .deserialize_current()
                .with_context(|| format!("Corrupt document in collection {}", collection))?;
            docs.push(to_json(doc));
        }
        Ok(docs)
    }

    async fn count(&self, collection: &str) -> Result<i64> {
        let count = self
            .db
            .collection::<Document>(collection)
            .count_documents(doc! {})
            .await
            .with_context(|| format!("Failed to count collection {}", collection))?;
        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;

    #[test]
    fn test_string_ids_survive_conversion() {
        let body = json!({"swName": "widget", "_id": "000000000000000000000001"});
        let doc = to_document(&body).unwrap();
        assert_eq!(doc.get_str("_id").unwrap(), "000000000000000000000001");
        assert_eq!(to_json(doc), body);
    }

    #[test]
    fn test_object_ids_read_back_as_hex() {
        let id = ObjectId::parse_str("5a1b2c3d4e5f60718293a4b5").unwrap();
        let doc = doc! { "_id": id, "host": "ioc1", "software": id, "name": "widget-ioc" };
        let value = to_json(doc);
        assert_eq!(value["_id"], "5a1b2c3d4e5f60718293a4b5");
        assert_eq!(value["software"], "5a1b2c3d4e5f60718293a4b5");
        assert_eq!(value["host"], "ioc1");
    }

    #[tokio::test]
    async fn test_tls_switches_become_options() {
        let target = ConnectionTarget::parse(
            "mongodb://localhost:27017/admin?ssl=true&sslValidate=false&authSource=swdb-dev",
        )
        .unwrap();
        let options = client_options(&target).await.unwrap();
        match options.tls {
            Some(Tls::Enabled(tls)) => assert_eq!(tls.allow_invalid_certificates, Some(true)),
            other => panic!("expected TLS enabled, got {:?}", other),
        }

        let plain = ConnectionTarget::parse("mongodb://localhost:27017/swdb").unwrap();
        assert!(client_options(&plain).await.unwrap().tls.is_none());
    }

    #[tokio::test]
    async fn test_open_rejects_sqlite_url() {
        let target = ConnectionTarget::parse("sqlite://swdb.db").unwrap();
        let err = match MongoStore::open(&target).await {
            Ok(_) => panic!("sqlite URL accepted"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("Not a MongoDB connection string"));
    }
}
