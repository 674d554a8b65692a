//! Trait for the text-summarization collaborator.

use anyhow::Result;

/// Turns a block of plain text into a short natural-language summary.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;
}
