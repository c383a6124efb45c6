//! Service configuration
//!
//! Loaded from a JSON file, then overridden by environment variables,
//! then validated before boot. Connection parameters for the search
//! store and the HTTP bind address both live here.
//!
//! Environment overrides (applied when set and non-empty):
//! - `ROSTERDB_STORE_ENDPOINT`
//! - `ROSTERDB_COLLECTION`
//! - `ROSTERDB_BIND_ADDR`

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ident::IdStrategy;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors; all fatal at boot.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the search store, e.g. "http://127.0.0.1:9200".
    pub store_endpoint: String,
    /// Collection (index) holding the user records.
    pub collection: String,
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// How new record ids are minted.
    #[serde(default)]
    pub id_strategy: IdStrategy,
    /// Deadline budget for a single inbound request.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

impl Config {
    /// Load from file, apply environment overrides, validate.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&content)?;
        config.apply_overrides(|key| std::env::var(key).ok().filter(|v| !v.is_empty()));
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the environment in production).
    fn apply_overrides<F: Fn(&str) -> Option<String>>(&mut self, get: F) {
        if let Some(endpoint) = get("ROSTERDB_STORE_ENDPOINT") {
            self.store_endpoint = endpoint;
        }
        if let Some(collection) = get("ROSTERDB_COLLECTION") {
            self.collection = collection;
        }
        if let Some(bind_addr) = get("ROSTERDB_BIND_ADDR") {
            self.bind_addr = bind_addr;
        }
    }

    /// Reject configurations that cannot possibly boot.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store_endpoint.is_empty() {
            return Err(ConfigError::Invalid(
                "store_endpoint must not be empty".to_string(),
            ));
        }
        if self.collection.is_empty() {
            return Err(ConfigError::Invalid(
                "collection must not be empty".to_string(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_ms must be positive".to_string(),
            ));
        }
        self.parsed_bind_addr()?;
        Ok(())
    }

    /// The bind address as a socket address.
    pub fn parsed_bind_addr(&self) -> ConfigResult<SocketAddr> {
        self.bind_addr.parse().map_err(|_| {
            ConfigError::Invalid(format!("bind_addr '{}' is not a socket address", self.bind_addr))
        })
    }

    /// Per-request deadline budget.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn base_config() -> Config {
        Config {
            store_endpoint: "http://127.0.0.1:9200".to_string(),
            collection: "users".to_string(),
            bind_addr: default_bind_addr(),
            id_strategy: IdStrategy::default(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }

    #[test]
    fn loads_minimal_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"store_endpoint": "http://127.0.0.1:9200", "collection": "users"}}"#
        )
        .expect("write config");

        let config = Config::load(file.path()).expect("load");
        assert_eq!(config.store_endpoint, "http://127.0.0.1:9200");
        assert_eq!(config.collection, "users");
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.id_strategy, IdStrategy::Uuid);
        assert_eq!(config.request_timeout(), Duration::from_millis(10_000));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"collection": "users"}}"#).expect("write config");

        let err = Config::load(file.path()).expect_err("should reject");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn override_wins_over_file_value() {
        let mut config = base_config();
        config.apply_overrides(|key| match key {
            "ROSTERDB_COLLECTION" => Some("users_staging".to_string()),
            _ => None,
        });
        assert_eq!(config.collection, "users_staging");
        assert_eq!(config.store_endpoint, "http://127.0.0.1:9200");
    }

    #[test]
    fn empty_override_is_ignored_by_load_filter() {
        // load() filters empty values before they reach apply_overrides
        let mut config = base_config();
        config.apply_overrides(|_| None);
        assert_eq!(config.collection, "users");
    }

    #[test]
    fn empty_collection_is_invalid() {
        let mut config = base_config();
        config.collection.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn unparseable_bind_addr_is_invalid() {
        let mut config = base_config();
        config.bind_addr = "not-an-addr".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn sequence_strategy_round_trips_through_json() {
        let json = r#"{
            "store_endpoint": "http://127.0.0.1:9200",
            "collection": "users",
            "id_strategy": "sequence"
        }"#;
        let config: Config = serde_json::from_str(json).expect("parse");
        assert_eq!(config.id_strategy, IdStrategy::Sequence);
    }
}
