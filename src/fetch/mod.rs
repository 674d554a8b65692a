//! HTTP plumbing shared by the flight API and summarizer clients.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::Result;
use tracing::debug;

/// Issues a GET and returns the body. Non-2xx statuses are errors.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    let bytes = resp.bytes().await?.to_vec();
    debug!(bytes = bytes.len(), "Response body received");
    Ok(bytes)
}

/// POSTs a JSON body and returns the response body. Non-2xx statuses are errors.
pub async fn post_json<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
    body: &impl serde::Serialize,
) -> Result<Vec<u8>> {
    let mut req = reqwest::Request::new(reqwest::Method::POST, url.parse()?);
    req.headers_mut().insert(
        reqwest::header::CONTENT_TYPE,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    *req.body_mut() = Some(serde_json::to_vec(body)?.into());

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!("API returned status {}: {}", status, text));
    }
    Ok(resp.bytes().await?.to_vec())
}
