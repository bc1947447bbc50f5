//! Output targets for assembled batches
//!
//! A sink receives a finished [`ImportBatch`] and reports what happened to
//! each record. Sinks never feed back into assembly: ids, keys, and issues
//! are settled before delivery starts.

mod file;
mod http;
mod store;

use anyhow::Result;
use async_trait::async_trait;

use crate::api::DeliveryReport;
use crate::import::types::ImportBatch;

pub use file::JsonFileSink;
pub use http::HttpSink;
pub use store::DocumentStoreSink;

#[async_trait]
pub trait RecordSink: Send {
    /// Short human-readable target description for logs
    fn describe(&self) -> String;

    /// Deliver every record of `batch`
    ///
    /// Per-record failures go into the report; `Err` means the target as a
    /// whole was unusable.
    async fn deliver(&mut self, batch: &ImportBatch) -> Result<DeliveryReport>;
}
