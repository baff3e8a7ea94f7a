//! Cache-aside resolution for a single commodity.
//!
//! ## Algorithm
//! 1. Read the stored record. A read error aborts; it is never treated as a miss.
//! 2. If the record is fresh, serve it ([`ResultEnvelope::CacheHit`]). The provider
//!    is not called.
//! 3. Otherwise fetch from the provider. A fetch error aborts. A stale record is
//!    **not** served as a fallback.
//! 4. Build the new record and overwrite the stored one. A write error aborts and
//!    the freshly built record is dropped.
//! 5. Serve the new record ([`ResultEnvelope::FreshFetch`]).
//!
//! So a `FreshFetch` is only ever reported for a record that is persisted.
//!
//! ## Concurrency
//! Steps run strictly in order for one key. Nothing coordinates two resolutions of
//! the same key: both may fetch, and the last write wins.

use std::sync::Arc;

use commodity_ingestor::{
    models::commodity::CommodityKey,
    providers::{ApiKey, ProviderError, SeriesProvider},
};
use serde::{Deserialize, Serialize};

use crate::{
    clock::SharedClock,
    config::PipelineConfig,
    freshness::FreshnessPolicy,
    record::{DocumentBuilder, SeriesRecord},
    retention::RetentionError,
    store::{DocumentStore, SeriesStore, StoreError},
};

/// Errors that abort a single-key resolution.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Reading or writing the store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The provider call failed or returned an unusable payload.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The configured retention limit is invalid.
    #[error(transparent)]
    Retention(#[from] RetentionError),
}

/// Outcome of resolving one commodity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "servedFrom")]
pub enum ResultEnvelope {
    /// A fresh stored record was served without contacting the provider.
    #[serde(rename = "cache")]
    CacheHit {
        /// Commodity served.
        #[serde(rename = "commodity")]
        key: CommodityKey,
        /// The stored record.
        record: SeriesRecord,
    },

    /// The record was refetched and persisted before being served.
    #[serde(rename = "fresh")]
    FreshFetch {
        /// Commodity served.
        #[serde(rename = "commodity")]
        key: CommodityKey,
        /// The newly written record.
        record: SeriesRecord,
    },

    /// Resolution failed.
    #[serde(rename = "error")]
    Failure {
        /// Commodity that failed.
        #[serde(rename = "commodity")]
        key: CommodityKey,
        /// Human-readable reason.
        #[serde(rename = "error")]
        error_message: String,
    },
}

impl ResultEnvelope {
    /// Renders a resolution error for `key`.
    pub fn failure(key: CommodityKey, error: impl ToString) -> Self {
        ResultEnvelope::Failure {
            key,
            error_message: error.to_string(),
        }
    }

    /// Commodity this envelope is about.
    pub fn key(&self) -> CommodityKey {
        match self {
            ResultEnvelope::CacheHit { key, .. }
            | ResultEnvelope::FreshFetch { key, .. }
            | ResultEnvelope::Failure { key, .. } => *key,
        }
    }

    /// Served record, absent for failures.
    pub fn record(&self) -> Option<&SeriesRecord> {
        match self {
            ResultEnvelope::CacheHit { record, .. } | ResultEnvelope::FreshFetch { record, .. } => {
                Some(record)
            }
            ResultEnvelope::Failure { .. } => None,
        }
    }

    /// `true` for cache hits and fresh fetches.
    pub fn is_success(&self) -> bool {
        !matches!(self, ResultEnvelope::Failure { .. })
    }

    /// `true` only for cache hits.
    pub fn is_cache_hit(&self) -> bool {
        matches!(self, ResultEnvelope::CacheHit { .. })
    }
}

/// Resolves commodities against the store, refreshing from the provider when stale.
pub struct RefreshOrchestrator {
    store: SeriesStore,
    provider: Arc<dyn SeriesProvider>,
    builder: DocumentBuilder,
    freshness: FreshnessPolicy,
    clock: SharedClock,
}

impl RefreshOrchestrator {
    /// Orchestrator with the default retention limit and freshness threshold.
    pub fn new(store: SeriesStore, provider: Arc<dyn SeriesProvider>, clock: SharedClock) -> Self {
        Self {
            store,
            provider,
            builder: DocumentBuilder::new(Arc::clone(&clock)),
            freshness: FreshnessPolicy::default(),
            clock,
        }
    }

    /// Orchestrator wired from configuration: collection, retention limit and threshold.
    pub fn from_config(
        config: &PipelineConfig,
        backend: Arc<dyn DocumentStore>,
        provider: Arc<dyn SeriesProvider>,
        clock: SharedClock,
    ) -> Self {
        let store = SeriesStore::new(backend, config.collection.clone());
        Self::new(store, provider, clock)
            .with_freshness(config.freshness())
            .with_retention_limit(config.retention_limit)
    }

    /// Replaces the freshness policy.
    pub fn with_freshness(mut self, freshness: FreshnessPolicy) -> Self {
        self.freshness = freshness;
        self
    }

    /// Replaces the retention limit applied to new records.
    pub fn with_retention_limit(mut self, limit: usize) -> Self {
        self.builder = self.builder.with_retention_limit(limit);
        self
    }

    /// The store gateway in use.
    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    /// The freshness policy in use.
    pub fn freshness(&self) -> FreshnessPolicy {
        self.freshness
    }

    /// Resolves `key`, serving from the store when fresh and refetching otherwise.
    pub async fn resolve(
        &self,
        key: CommodityKey,
        api_key: &ApiKey,
    ) -> Result<ResultEnvelope, PipelineError> {
        let cached = match self.store.read(key).await? {
            Some(record) if self.freshness.is_fresh(Some(&record), self.clock.now()) => {
                tracing::info!(commodity = %key, fetched_at = %record.fetched_at, "serving cached series");
                return Ok(ResultEnvelope::CacheHit { key, record });
            }
            other => other,
        };

        tracing::info!(
            commodity = %key,
            had_record = cached.is_some(),
            "cached series missing or stale, refreshing"
        );
        let raw = self.provider.fetch_series(key, api_key).await?;
        let record = self.builder.build(raw)?;
        self.store.write(key, &record).await?;

        tracing::info!(commodity = %key, points = record.point_count, "series refreshed");
        Ok(ResultEnvelope::FreshFetch { key, record })
    }
}
