//! Configuration Module
//!
//! Handles loading and validating server configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::error::{Result, StoreError};

/// Default snapshot location, relative to the working directory.
pub const DEFAULT_SNAPSHOT_PATH: &str = "data/snapshot.json";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the read cache can hold
    pub cache_capacity: usize,
    /// Snapshot file; `None` runs the store memory-only
    pub snapshot_path: Option<PathBuf>,
    /// HTTP server port
    pub server_port: u16,
}

/// Construction parameters for a [`crate::store::VersionedStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Fixed capacity of the LRU read cache, must be positive
    pub cache_capacity: usize,
    /// Snapshot file; `None` disables persistence
    pub snapshot_path: Option<PathBuf>,
}

impl StoreConfig {
    /// Memory-only store configuration.
    pub fn in_memory(cache_capacity: usize) -> Self {
        Self {
            cache_capacity,
            snapshot_path: None,
        }
    }

    /// Store configuration persisting to `path`.
    pub fn persistent(cache_capacity: usize, path: impl Into<PathBuf>) -> Self {
        Self {
            cache_capacity,
            snapshot_path: Some(path.into()),
        }
    }

    /// Rejects configurations the store cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(StoreError::InvalidConfig(
                "cache capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Read cache capacity (default: 1000)
    /// - `SNAPSHOT_PATH` - Snapshot file (default: `data/snapshot.json`, empty = memory-only)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        Self {
            cache_capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            snapshot_path: match env::var("SNAPSHOT_PATH") {
                Ok(v) if v.is_empty() => None,
                Ok(v) => Some(PathBuf::from(v)),
                Err(_) => Some(PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
            },
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }

    /// Validates the configuration. A zero capacity is fatal.
    pub fn validate(&self) -> Result<()> {
        self.store_config().validate()
    }

    /// Extracts the store construction parameters.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            cache_capacity: self.cache_capacity,
            snapshot_path: self.snapshot_path.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: 1000,
            snapshot_path: Some(PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
            server_port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(
            config.snapshot_path,
            Some(PathBuf::from(DEFAULT_SNAPSHOT_PATH))
        );
        assert_eq!(config.server_port, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the environment to avoid races between tests
        env::remove_var("CACHE_CAPACITY");
        env::remove_var("SNAPSHOT_PATH");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(
            config.snapshot_path,
            Some(PathBuf::from(DEFAULT_SNAPSHOT_PATH))
        );
        assert_eq!(config.server_port, 3000);

        env::set_var("CACHE_CAPACITY", "not-a-number");
        env::set_var("SNAPSHOT_PATH", "");
        let config = Config::from_env();
        assert_eq!(config.cache_capacity, 1000);
        assert!(config.snapshot_path.is_none());

        env::set_var("CACHE_CAPACITY", "0");
        let config = Config::from_env();
        assert!(matches!(
            config.validate(),
            Err(StoreError::InvalidConfig(_))
        ));

        env::remove_var("CACHE_CAPACITY");
        env::remove_var("SNAPSHOT_PATH");
    }

    #[test]
    fn test_store_config_zero_capacity_rejected() {
        assert!(StoreConfig::in_memory(0).validate().is_err());
        assert!(StoreConfig::in_memory(1).validate().is_ok());
        assert!(StoreConfig::persistent(0, "x.json").validate().is_err());
    }
}
