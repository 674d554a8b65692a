use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::fetch::auth::ApiKey;
use crate::fetch::{BasicClient, HttpClient, post_json};
use crate::services::summarizer::Summarizer;

const MAX_LENGTH: u32 = 100;
const MIN_LENGTH: u32 = 25;

/// Request body of a hosted summarization endpoint.
#[derive(Debug, Serialize)]
pub struct SummaryRequest<'a> {
    pub inputs: &'a str,
    pub parameters: SummaryParameters,
}

#[derive(Debug, Serialize)]
pub struct SummaryParameters {
    pub max_length: u32,
    pub min_length: u32,
    pub do_sample: bool,
}

impl<'a> SummaryRequest<'a> {
    /// Deterministic summary of 25 to 100 tokens.
    pub fn new(inputs: &'a str) -> Self {
        Self {
            inputs,
            parameters: SummaryParameters {
                max_length: MAX_LENGTH,
                min_length: MIN_LENGTH,
                do_sample: false,
            },
        }
    }
}

#[derive(Deserialize)]
struct SummaryOutput {
    summary_text: String,
}

#[derive(Deserialize)]
struct ErrorOutput {
    error: String,
}

/// Extracts the first `summary_text` from an inference response body.
pub fn parse_summary_response(bytes: &[u8]) -> Result<String> {
    if let Ok(outputs) = serde_json::from_slice::<Vec<SummaryOutput>>(bytes) {
        return outputs
            .into_iter()
            .next()
            .map(|o| o.summary_text.trim().to_string())
            .ok_or_else(|| anyhow!("summarizer returned no output"));
    }

    match serde_json::from_slice::<ErrorOutput>(bytes) {
        Ok(e) => Err(anyhow!("summarizer error: {}", e.error)),
        Err(e) => Err(anyhow!("failed to parse summarizer response: {}", e)),
    }
}

/// Calls a hosted text-summarization model (default `facebook/bart-large-cnn`).
pub struct HostedSummarizer {
    http: Box<dyn HttpClient>,
    endpoint: String,
}

impl HostedSummarizer {
    /// Uses `SUMMARIZER_URL`, authenticating with `SUMMARIZER_TOKEN` when set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let basic = BasicClient::new()?;
        let http: Box<dyn HttpClient> = match config.summarizer_token.as_deref() {
            Some(token) => Box::new(ApiKey::bearer(basic, token)?),
            None => Box::new(basic),
        };
        Ok(Self {
            http,
            endpoint: config.summarizer_url.clone(),
        })
    }
}

#[async_trait]
impl Summarizer for HostedSummarizer {
    #[tracing::instrument(skip(self, text), fields(endpoint = %self.endpoint, chars = text.len()))]
    async fn summarize(&self, text: &str) -> Result<String> {
        info!("Requesting summary");
        let body = post_json(self.http.as_ref(), &self.endpoint, &SummaryRequest::new(text)).await?;
        parse_summary_response(&body)
    }
}
