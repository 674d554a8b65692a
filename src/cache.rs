//! Single-file JSON cache of the last successfully fetched payload.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// The payload is stored verbatim and overwritten whole on every save.
#[derive(Debug, Clone)]
pub struct PayloadCache {
    path: PathBuf,
}

impl PayloadCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Replaces the cache file with `payload`.
    pub fn save(&self, payload: &Value) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_vec(payload)?;
        std::fs::write(&self.path, body)?;
        info!(path = %self.path.display(), "Payload cached");
        Ok(())
    }

    /// Reads the cached payload back.
    ///
    /// # Errors
    ///
    /// [`Error::CacheMiss`] when no file exists, [`Error::CacheRead`] when it
    /// cannot be read or is not valid JSON.
    pub fn load(&self) -> Result<Value> {
        if !self.exists() {
            return Err(Error::CacheMiss {
                path: self.path.clone(),
            });
        }

        let content = std::fs::read(&self.path).map_err(|e| Error::CacheRead {
            path: self.path.clone(),
            source: e.into(),
        })?;
        let payload = serde_json::from_slice(&content).map_err(|e| Error::CacheRead {
            path: self.path.clone(),
            source: e.into(),
        })?;
        debug!(path = %self.path.display(), bytes = content.len(), "Cache loaded");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_missing_file_is_cache_miss() {
        let path = temp_path("flight_demand_test_missing.json");
        let _ = fs::remove_file(&path);

        let err = PayloadCache::new(&path).load().unwrap_err();
        assert!(err.is_cache_miss());
    }

    #[test]
    fn test_save_then_load_verbatim() {
        let path = temp_path("flight_demand_test_cache.json");
        let payload = json!({"pagination": {"limit": 100}, "data": [{"flight_date": "2024-01-01"}]});

        let cache = PayloadCache::new(&path);
        cache.save(&payload).unwrap();
        assert_eq!(cache.load().unwrap(), payload);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_overwrites_whole_file() {
        let path = temp_path("flight_demand_test_overwrite.json");
        let cache = PayloadCache::new(&path);

        cache.save(&json!({"data": [1, 2, 3], "extra": true})).unwrap();
        cache.save(&json!({"data": []})).unwrap();
        assert_eq!(cache.load().unwrap(), json!({"data": []}));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_malformed_file_is_read_error() {
        let path = temp_path("flight_demand_test_malformed.json");
        fs::write(&path, "{\"data\": [").unwrap();

        let err = PayloadCache::new(&path).load().unwrap_err();
        assert!(matches!(err, Error::CacheRead { .. }));

        fs::remove_file(&path).unwrap();
    }
}
