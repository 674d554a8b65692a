//! Trait for producers of raw flight payloads.

use serde_json::Value;

use crate::error::Result;

/// Abstraction over an upstream flight-schedule API (e.g., AviationStack).
///
/// Implementations return the payload verbatim. A payload that arrives but
/// lacks a `data` list is reported as [`Error::MissingData`](crate::error::Error::MissingData).
#[async_trait::async_trait]
pub trait FlightSource: Send + Sync {
    /// Performs one fetch of the `{"data": [...]}` payload.
    async fn fetch_payload(&self) -> Result<Value>;
}
