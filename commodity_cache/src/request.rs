//! Inbound requests and the responses handed back to whatever exposes the pipeline.
//!
//! A request names one commodity or asks for all of them. Single-key failures come
//! back as a failed envelope (the caller maps that to a non-success status); batch
//! responses always succeed as a whole, with failed keys marked individually.

use commodity_ingestor::{models::commodity::CommodityKey, providers::ApiKey};
use serde::Serialize;

use crate::{
    fanout::{BatchResult, FanOutCoordinator},
    orchestrator::ResultEnvelope,
};

/// What the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineRequest {
    /// One commodity.
    Single(CommodityKey),
    /// Every known commodity.
    All,
}

impl PipelineRequest {
    /// Builds a request from loosely typed inputs.
    ///
    /// `all` wins over `commodity`. A missing or unrecognized commodity falls back
    /// to [`CommodityKey::FALLBACK`].
    pub fn from_parts(commodity: Option<&str>, all: bool) -> Self {
        if all {
            return PipelineRequest::All;
        }
        let key = match commodity {
            None => CommodityKey::FALLBACK,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    requested = raw,
                    fallback = %CommodityKey::FALLBACK,
                    "unrecognized commodity, using fallback"
                );
                CommodityKey::FALLBACK
            }),
        };
        PipelineRequest::Single(key)
    }
}

/// Response for a [`PipelineRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PipelineResponse {
    /// The envelope for a single-key request, serialized as is.
    Single(ResultEnvelope),
    /// The merged batch for an all-keys request.
    All(BatchResult),
}

impl PipelineResponse {
    /// `false` only when a single-key request failed.
    pub fn is_success(&self) -> bool {
        match self {
            PipelineResponse::Single(envelope) => envelope.is_success(),
            PipelineResponse::All(_) => true,
        }
    }
}

/// Serves `request`.
pub async fn handle(
    coordinator: &FanOutCoordinator,
    request: PipelineRequest,
    api_key: &ApiKey,
) -> PipelineResponse {
    match request {
        PipelineRequest::Single(key) => {
            match coordinator.orchestrator().resolve(key, api_key).await {
                Ok(envelope) => PipelineResponse::Single(envelope),
                Err(e) => {
                    tracing::warn!(commodity = %key, error = %e, "single commodity request failed");
                    PipelineResponse::Single(ResultEnvelope::failure(key, e))
                }
            }
        }
        PipelineRequest::All => PipelineResponse::All(coordinator.resolve_every(api_key).await),
    }
}
