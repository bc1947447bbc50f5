//! Document collections persisted in sqlite

use std::str::FromStr;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::DocumentStore;
use super::connection::ConnectionTarget;

/// JSON documents in one sqlite table, keyed by database and collection
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    database: String,
}

impl SqliteStore {
    /// Connect to `target` and prepare the schema
    pub async fn open(target: &ConnectionTarget) -> Result<Self> {
        if !target.is_sqlite() {
            bail!(
                "Unsupported connection string '{}': only sqlite: URLs can be opened",
                target.connect_url
            );
        }

        let options = SqliteConnectOptions::from_str(&target.connect_url)
            .with_context(|| format!("Invalid connection string: {}", target.connect_url))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to {}", target.connect_url))?;

        log::info!(
            "Connected to document store {} (database '{}')",
            target.connect_url,
            target.database
        );
        Self::with_pool(pool, target.database.clone()).await
    }

    /// Wrap an existing pool, running migrations first
    pub async fn with_pool(pool: SqlitePool, database: impl Into<String>) -> Result<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run document store migrations")?;
        Ok(Self {
            pool,
            database: database.into(),
        })
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    fn database(&self) -> &str {
        &self.database
    }

    /// A repeated `doc_id` in the same collection fails
    async fn insert(
        &self,
        collection: &str,
        doc_id: Option<&str>,
        body: &Value,
    ) -> Result<()> {
        let json = serde_json::to_string(body).context("Failed to serialize document")?;
        sqlx::query(
            "INSERT INTO documents (database, collection, doc_id, body)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&self.database)
        .bind(collection)
        .bind(doc_id)
        .bind(json)
        .execute(&self.pool)
        .await
        .with_context(|| match doc_id {
            Some(id) => format!("Failed to insert document {} into {}", id, collection),
            None => format!("Failed to insert document into {}", collection),
        })?;

        Ok(())
    }

    /// Documents come back in insertion order
    async fn find_all(&self, collection: &str) -> Result<Vec<Value>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT body FROM documents
             WHERE database = ? AND collection = ?
             ORDER BY id",
        )
        .bind(&self.database)
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to read collection {}", collection))?;

        rows.into_iter()
            .map(|(body,)| {
                serde_json::from_str(&body)
                    .with_context(|| format!("Corrupt document in collection {}", collection))
            })
            .collect()
    }

    async fn count(&self, collection: &str) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM documents WHERE database = ? AND collection = ?",
        )
        .bind(&self.database)
        .bind(collection)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to count collection {}", collection))?;

        Ok(count)
    }
}
