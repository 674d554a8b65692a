use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetch::auth::UrlParam;
use crate::fetch::{BasicClient, HttpClient, fetch_bytes};
use crate::parser::{api_error_detail, data_records, parse_payload};
use crate::services::flight_source::FlightSource;

/// Fetches `/v1/flights` from AviationStack, one page of `limit` records.
pub struct AviationStackClient<C = UrlParam<BasicClient>> {
    http: C,
    base_url: String,
    limit: u32,
}

impl AviationStackClient {
    /// Builds a client from configuration. Requires `AVIATIONSTACK_API_KEY`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let key = config.require_api_key()?;
        let http = UrlParam::access_key(BasicClient::new().map_err(Error::Fetch)?, key);
        Ok(Self::with_client(http, &config.api_url, config.limit))
    }
}

impl<C: HttpClient> AviationStackClient<C> {
    pub fn with_client(http: C, base_url: &str, limit: u32) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            limit,
        }
    }

    /// Request URL without credentials, safe to log.
    pub fn url(&self) -> String {
        format!("{}?limit={}", self.base_url, self.limit)
    }
}

/// Accepts a payload only if it carries a `data` list.
pub(crate) fn ensure_data(payload: Value) -> Result<Value> {
    match data_records(&payload) {
        Some(records) => {
            debug!(records = records.len(), "Payload carries flight records");
            Ok(payload)
        }
        None => Err(Error::MissingData {
            detail: api_error_detail(&payload),
        }),
    }
}

#[async_trait]
impl<C: HttpClient> FlightSource for AviationStackClient<C> {
    #[tracing::instrument(skip(self), fields(url = %self.url()))]
    async fn fetch_payload(&self) -> Result<Value> {
        info!("Fetching data from AviationStack API");
        let bytes = fetch_bytes(&self.http, &self.url())
            .await
            .map_err(Error::Fetch)?;
        let payload = parse_payload(&bytes).map_err(Error::Fetch)?;
        ensure_data(payload)
    }
}
