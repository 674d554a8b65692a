//! Runtime configuration read from the environment (and `.env`).

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Default AviationStack flights endpoint.
pub const DEFAULT_API_URL: &str = "http://api.aviationstack.com/v1/flights";

/// Records requested per live fetch. One fetch is one API call.
pub const DEFAULT_LIMIT: u32 = 100;

/// Default cache file name.
pub const DEFAULT_CACHE_FILE: &str = "flights.json";

/// Default hosted summarization model.
pub const DEFAULT_SUMMARIZER_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-cnn";

/// Dashboard configuration.
///
/// Values come from these variables, falling back to the defaults above:
/// `AVIATIONSTACK_API_KEY`, `AVIATIONSTACK_URL`, `AVIATIONSTACK_LIMIT`,
/// `FLIGHT_CACHE_FILE`, `SUMMARIZER_URL`, `SUMMARIZER_TOKEN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_url: String,
    pub limit: u32,
    pub cache_file: PathBuf,
    pub summarizer_url: String,
    pub summarizer_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            limit: DEFAULT_LIMIT,
            cache_file: PathBuf::from(DEFAULT_CACHE_FILE),
            summarizer_url: DEFAULT_SUMMARIZER_URL.to_string(),
            summarizer_token: None,
        }
    }
}

impl Config {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let limit = match get("AVIATIONSTACK_LIMIT") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(Error::config(format!(
                        "AVIATIONSTACK_LIMIT must be a positive integer, got '{raw}'"
                    )));
                }
            },
            None => defaults.limit,
        };

        Ok(Self {
            api_key: get("AVIATIONSTACK_API_KEY"),
            api_url: get("AVIATIONSTACK_URL").unwrap_or(defaults.api_url),
            limit,
            cache_file: get("FLIGHT_CACHE_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_file),
            summarizer_url: get("SUMMARIZER_URL").unwrap_or(defaults.summarizer_url),
            summarizer_token: get("SUMMARIZER_TOKEN"),
        })
    }

    /// Returns the API key, or a configuration error naming the variable.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::config("AVIATIONSTACK_API_KEY must be set to fetch live data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.limit, 100);
        assert_eq!(config.cache_file, PathBuf::from("flights.json"));
    }

    #[test]
    fn test_values_override_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("AVIATIONSTACK_API_KEY", "secret"),
            ("AVIATIONSTACK_LIMIT", "25"),
            ("FLIGHT_CACHE_FILE", "/tmp/cache.json"),
            ("SUMMARIZER_TOKEN", "hf_token"),
        ]))
        .unwrap();

        assert_eq!(config.require_api_key().unwrap(), "secret");
        assert_eq!(config.limit, 25);
        assert_eq!(config.cache_file, PathBuf::from("/tmp/cache.json"));
        assert_eq!(config.summarizer_token.as_deref(), Some("hf_token"));
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_blank_key_is_unset() {
        let config = Config::from_lookup(lookup(&[("AVIATIONSTACK_API_KEY", "  ")])).unwrap();
        assert!(config.api_key.is_none());
        assert!(config.require_api_key().is_err());
    }

    #[test]
    fn test_invalid_limit_is_config_error() {
        let err = Config::from_lookup(lookup(&[("AVIATIONSTACK_LIMIT", "lots")])).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let err = Config::from_lookup(lookup(&[("AVIATIONSTACK_LIMIT", "0")])).unwrap_err();
        assert!(err.to_string().contains("AVIATIONSTACK_LIMIT"));
    }
}
