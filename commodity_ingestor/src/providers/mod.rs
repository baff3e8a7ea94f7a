//! Provider abstraction for commodity time-series sources.
//!
//! This module defines the [`SeriesProvider`] trait, the single seam through which
//! the pipeline talks to an upstream vendor. A provider fetches exactly one
//! commodity per call, validates the payload, and either returns a complete
//! [`RawSeries`] or an error. It never retries; retry policy belongs to the caller.
//!
//! The trait is designed for async usage and supports dynamic dispatch
//! (`Arc<dyn SeriesProvider>`), so tests can swap in a scripted provider.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use commodity_ingestor::models::{commodity::CommodityKey, raw_series::RawSeries};
//! use commodity_ingestor::providers::{ApiKey, ProviderError, SeriesProvider};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl SeriesProvider for MyProvider {
//!     async fn fetch_series(
//!         &self,
//!         key: CommodityKey,
//!         _api_key: &ApiKey,
//!     ) -> Result<RawSeries, ProviderError> {
//!         Ok(RawSeries {
//!             key,
//!             name: "demo".into(),
//!             unit: None,
//!             interval: Default::default(),
//!             points: vec![],
//!         })
//!     }
//! }
//! ```

pub mod alpha_vantage;

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var_or;
use snafu::{Backtrace, Snafu};

use crate::models::{commodity::CommodityKey, raw_series::RawSeries};

/// Publicly documented key the provider accepts in a heavily rate-limited demo mode.
pub const DEMO_API_KEY: &str = "demo";

/// Trait for fetching one commodity's series from a market data provider.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Fetches and validates the full series for `key`.
    ///
    /// # Returns
    ///
    /// * `Ok(RawSeries)` - A fully validated series, newest first.
    /// * `Err(ProviderError)` - Transport failure, non-success status, or a payload
    ///   that does not have the expected shape.
    async fn fetch_series(
        &self,
        key: CommodityKey,
        api_key: &ApiKey,
    ) -> Result<RawSeries, ProviderError>;
}

/// Credential passed to the provider on every request.
///
/// Cheap to clone; the secret is shared and redacted from `Debug` output.
#[derive(Clone)]
pub struct ApiKey {
    secret: Arc<SecretString>,
    is_demo: bool,
}

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        let key: String = key.into();
        let is_demo = key == DEMO_API_KEY;
        Self {
            secret: Arc::new(SecretString::new(key.into_boxed_str())),
            is_demo,
        }
    }

    /// The public demo key.
    pub fn demo() -> Self {
        Self::new(DEMO_API_KEY)
    }

    /// Reads the key from the environment variable `var`, falling back to the demo key.
    pub fn from_env(var: &str) -> Self {
        let (key, fell_back) = get_env_var_or(var, DEMO_API_KEY);
        if fell_back {
            tracing::warn!(
                env_var = var,
                "API key not set, using the public demo key (heavily rate limited)"
            );
        }
        Self::new(key)
    }

    /// `true` when this is the public demo key.
    pub fn is_demo(&self) -> bool {
        self.is_demo
    }

    pub fn expose_secret(&self) -> &str {
        self.secret.expose_secret()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("secret", &"[REDACTED]")
            .field("is_demo", &self.is_demo)
            .finish()
    }
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `SeriesProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider answered with a non-success HTTP status.
    #[snafu(display("upstream returned HTTP {status}: {body}"))]
    UpstreamStatus {
        status: u16,
        body: String,
        backtrace: Backtrace,
    },

    /// The provider's body was not the series shape we expect. Nothing from it is used.
    #[snafu(display("malformed upstream response: {message}"))]
    UpstreamShape {
        message: String,
        backtrace: Backtrace,
    },
}
