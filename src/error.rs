//! Error types for the flight demand dashboard.
//!
//! Every failure here ends the current action only. The session keeps its
//! previous table and the user decides whether to retry.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for dashboard actions.
#[derive(Error, Debug)]
pub enum Error {
    /// The upstream API could not be reached or answered with an error status.
    #[error("failed to fetch flight data: {0}")]
    Fetch(#[source] anyhow::Error),

    /// The upstream payload did not carry a `data` list.
    #[error("no data returned from API: {detail}")]
    MissingData {
        /// What the API returned instead.
        detail: String,
    },

    /// No cache file exists yet.
    #[error("no cached data found at {path}")]
    CacheMiss {
        /// Where the cache was expected.
        path: PathBuf,
    },

    /// The cache file exists but could not be read or decoded.
    #[error("failed to load cached data from {path}: {source}")]
    CacheRead {
        /// Path of the cache file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: anyhow::Error,
    },

    /// Configuration value could not be used.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the problem.
        message: String,
    },

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for dashboard operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this error means there was nothing cached to load.
    #[must_use]
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, Self::CacheMiss { .. })
    }
}
