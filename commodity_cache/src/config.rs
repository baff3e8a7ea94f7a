//! Pipeline configuration: parsing, defaults, and validation.
//!
//! Configuration is a small TOML file; every field is optional and falls back to
//! the production defaults:
//!
//! ```toml
//! collection = "commodities"
//! retention_limit = 60
//! freshness_threshold_days = 7
//! base_url = "https://www.alphavantage.co/query"
//! request_timeout_secs = 30
//! api_key_env = "ALPHA_VANTAGE_API_KEY"
//! ```
//!
//! The API key itself never lives in the file. `api_key_env` names the environment
//! variable it is read from, with the provider's public demo key as the fallback.
//!
//! Entrypoints:
//! - Parse + validate from a TOML string: [`load_config_str`]
//! - Parse + validate from a file path: [`load_config_path`]

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use commodity_ingestor::providers::{ApiKey, alpha_vantage::params::BASE_URL};
use serde::{Deserialize, Serialize};

use crate::{freshness::FreshnessPolicy, retention::RETENTION_LIMIT, store::DEFAULT_COLLECTION};

/// Environment variable holding the provider API key unless configured otherwise.
pub const DEFAULT_API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or has unknown fields.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings for the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Document collection records are stored under.
    pub collection: String,
    /// Maximum points kept per series.
    pub retention_limit: usize,
    /// Maximum age in whole days of a servable record.
    pub freshness_threshold_days: u32,
    /// Provider query endpoint.
    pub base_url: String,
    /// Per-request provider timeout.
    pub request_timeout_secs: u64,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            retention_limit: RETENTION_LIMIT,
            freshness_threshold_days: crate::freshness::DEFAULT_THRESHOLD_DAYS,
            base_url: BASE_URL.to_string(),
            request_timeout_secs: 30,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Checks every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let collection = self.collection.trim();
        if collection.is_empty() || collection.contains('/') {
            return Err(ConfigError::Invalid(format!(
                "collection must be a non-empty name without '/', got {:?}",
                self.collection
            )));
        }
        if self.retention_limit == 0 {
            return Err(ConfigError::Invalid("retention_limit must be at least 1".into()));
        }
        if self.freshness_threshold_days == 0 {
            return Err(ConfigError::Invalid(
                "freshness_threshold_days must be at least 1".into(),
            ));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        if self.api_key_env.trim().is_empty() {
            return Err(ConfigError::Invalid("api_key_env must not be empty".into()));
        }
        Ok(())
    }

    /// Per-request provider timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Freshness policy built from the threshold.
    pub fn freshness(&self) -> FreshnessPolicy {
        FreshnessPolicy::new(self.freshness_threshold_days)
    }

    /// Reads the API key from the configured variable, falling back to the demo key.
    pub fn api_key(&self) -> ApiKey {
        ApiKey::from_env(&self.api_key_env)
    }
}

/// Parses and validates configuration from a TOML string.
pub fn load_config_str(s: &str) -> Result<PipelineConfig, ConfigError> {
    let cfg: PipelineConfig = toml::from_str(s)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Reads, parses and validates configuration from a file.
pub fn load_config_path(path: impl AsRef<Path>) -> Result<PipelineConfig, ConfigError> {
    let path = path.as_ref();
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_str(&s)
}
