//! Concurrent resolution of a batch of commodities.
//!
//! Every key gets its own task, and all tasks are started before any is awaited.
//! There is no pacing between them, so a rate-limited provider shows up as per-key
//! failures. Outcomes are settled independently: an error or panic in one key's task
//! becomes that key's [`ResultEnvelope::Failure`] and never affects the others.
//! Results come back in the caller's key order, whatever order the tasks finish in.

use std::sync::Arc;

use commodity_ingestor::{models::commodity::CommodityKey, providers::ApiKey};
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::orchestrator::{RefreshOrchestrator, ResultEnvelope};

/// Merged outcome of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "all")]
pub struct BatchResult {
    /// Number of keys in the batch.
    #[serde(rename = "totalCommodities")]
    pub total: usize,
    /// Cache hits plus fresh fetches.
    #[serde(rename = "successfulFetches")]
    pub success_count: usize,
    /// Cache hits only.
    #[serde(rename = "cacheHits")]
    pub cache_hit_count: usize,
    /// One envelope per requested key, in request order.
    pub results: Vec<ResultEnvelope>,
}

impl BatchResult {
    /// Tallies `results`.
    pub fn from_results(results: Vec<ResultEnvelope>) -> Self {
        Self {
            total: results.len(),
            success_count: results.iter().filter(|r| r.is_success()).count(),
            cache_hit_count: results.iter().filter(|r| r.is_cache_hit()).count(),
            results,
        }
    }

    /// Envelopes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &ResultEnvelope> {
        self.results.iter().filter(|r| !r.is_success())
    }
}

/// Runs the orchestrator for many keys at once.
#[derive(Clone)]
pub struct FanOutCoordinator {
    orchestrator: Arc<RefreshOrchestrator>,
}

impl FanOutCoordinator {
    /// Coordinator sharing `orchestrator` across its tasks.
    pub fn new(orchestrator: Arc<RefreshOrchestrator>) -> Self {
        Self { orchestrator }
    }

    /// The orchestrator each task runs.
    pub fn orchestrator(&self) -> &Arc<RefreshOrchestrator> {
        &self.orchestrator
    }

    /// Resolves every key in `keys` concurrently and merges the outcomes.
    pub async fn resolve_all(&self, keys: &[CommodityKey], api_key: &ApiKey) -> BatchResult {
        let handles: Vec<_> = keys
            .iter()
            .map(|&key| {
                let orchestrator = Arc::clone(&self.orchestrator);
                let api_key = api_key.clone();
                tokio::spawn(async move { orchestrator.resolve(key, &api_key).await })
            })
            .collect();

        let outcomes = join_all(handles).await;

        let results: Vec<ResultEnvelope> = keys
            .iter()
            .zip(outcomes)
            .map(|(&key, outcome)| match outcome {
                Ok(Ok(envelope)) => envelope,
                Ok(Err(e)) => {
                    tracing::warn!(commodity = %key, error = %e, "commodity resolution failed");
                    ResultEnvelope::failure(key, e)
                }
                Err(e) => {
                    tracing::warn!(commodity = %key, error = %e, "commodity resolution task aborted");
                    ResultEnvelope::failure(key, format!("resolution task failed: {e}"))
                }
            })
            .collect();

        let batch = BatchResult::from_results(results);
        tracing::info!(
            total = batch.total,
            succeeded = batch.success_count,
            cache_hits = batch.cache_hit_count,
            "batch resolved"
        );
        batch
    }

    /// Resolves every known commodity.
    pub async fn resolve_every(&self, api_key: &ApiKey) -> BatchResult {
        self.resolve_all(&CommodityKey::ALL, api_key).await
    }
}
