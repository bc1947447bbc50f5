//! Document database target
//!
//! `mongodb://` connection strings go to a MongoDB server; `sqlite:` ones
//! keep the same collections in a local file.

mod connection;
mod mongo;
mod sqlite;

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde_json::Value;

pub use connection::ConnectionTarget;
pub use mongo::MongoStore;
pub use sqlite::SqliteStore;

/// A logical database holding named collections of JSON documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Name of the logical database
    fn database(&self) -> &str;

    /// Insert one document; `doc_id` is its `_id`, if it has one
    async fn insert(&self, collection: &str, doc_id: Option<&str>, body: &Value) -> Result<()>;

    /// All documents of a collection
    async fn find_all(&self, collection: &str) -> Result<Vec<Value>>;

    async fn count(&self, collection: &str) -> Result<i64>;
}

/// Open the store a connection string points at
pub async fn open(conn: &str) -> Result<Box<dyn DocumentStore>> {
    let target = ConnectionTarget::parse(conn)?;
    if target.is_sqlite() {
        Ok(Box::new(SqliteStore::open(&target).await?))
    } else if target.is_mongodb() {
        Ok(Box::new(MongoStore::open(&target).await?))
    } else {
        bail!(
            "Unsupported connection string '{}': expected a mongodb:// or sqlite: URL",
            target.connect_url
        )
    }
}
