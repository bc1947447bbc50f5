//! Software database web API
//!
//! Session login, record POSTs, and the per-record results every sink
//! reports with.

pub mod bodies;
pub mod client;
pub mod delivery;

pub use client::SwdbClient;
pub use delivery::{Collection, DeliveryReport, DeliveryResult};
