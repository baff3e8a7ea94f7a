//! Persistent storage for series records.
//!
//! Two layers:
//! - [`DocumentStore`]: a schemaless `path -> JSON document` store with get/overwrite.
//!   Adapters live in [`memory`] and [`sqlite`]; anything else (a hosted document
//!   database, say) only needs to implement this trait.
//! - [`SeriesStore`]: the gateway the pipeline uses. It maps each
//!   [`CommodityKey`] to exactly one document path and converts between
//!   [`SeriesRecord`] and JSON.
//!
//! Absence is not an error: reading a path that was never written yields `Ok(None)`.
//! A document whose `pointCount` disagrees with its points is rejected as undecodable.
//! Every failure is a [`StoreError`] and is returned to the caller unchanged. In
//! particular a read failure must never be mistaken for a cache miss.

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use commodity_ingestor::models::{commodity::CommodityKey, interval::SeriesInterval};
use serde_json::Value;

use crate::record::SeriesRecord;

/// Collection holding commodity documents unless configured otherwise.
pub const DEFAULT_COLLECTION: &str = "commodities";

/// Errors raised by document stores and the series gateway.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Opening the database failed.
    #[error("store connection failed: {0}")]
    Connection(#[from] diesel::ConnectionError),

    /// A query against the database failed.
    #[error("store query failed: {0}")]
    Query(#[from] diesel::result::Error),

    /// Applying schema migrations failed.
    #[error("store migration failed: {0}")]
    Migration(String),

    /// Any other backend failure (remote store, injected fault).
    #[error("store backend error: {0}")]
    Backend(String),

    /// A record could not be serialized for writing.
    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),

    /// A stored document exists but is not a valid record.
    #[error("document at {path} is not a valid series record: {source}")]
    Decode {
        /// Path of the offending document.
        path: String,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The background task running a blocking store call failed.
    #[error("store task failed: {0}")]
    Task(String),
}

/// Schemaless key-to-document store.
///
/// `set` is a full overwrite; concurrent writers to the same path are last-write-wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads the document at `path`, or `None` if nothing was written there.
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError>;

    /// Replaces the document at `path`.
    async fn set(&self, path: &str, document: Value) -> Result<(), StoreError>;
}

/// Gateway mapping commodities to their stored [`SeriesRecord`].
#[derive(Clone)]
pub struct SeriesStore {
    backend: Arc<dyn DocumentStore>,
    collection: String,
}

impl SeriesStore {
    /// Gateway over `backend`, storing records under `collection`.
    pub fn new(backend: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            backend,
            collection: collection.into(),
        }
    }

    /// Collection name used as the path prefix.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Document path for `key`: `{collection}/{KEY}_{interval}`.
    pub fn document_path(&self, key: CommodityKey) -> String {
        format!(
            "{}/{}_{}",
            self.collection,
            key.as_str(),
            SeriesInterval::Monthly.as_str()
        )
    }

    /// Reads the stored record for `key`.
    pub async fn read(&self, key: CommodityKey) -> Result<Option<SeriesRecord>, StoreError> {
        let path = self.document_path(key);
        let Some(doc) = self.backend.get(&path).await? else {
            return Ok(None);
        };
        let record: SeriesRecord =
            serde_json::from_value(doc).map_err(|source| StoreError::Decode {
                path: path.clone(),
                source,
            })?;
        if record.point_count != record.points.len() {
            return Err(StoreError::Decode {
                path,
                source: serde::de::Error::custom(format!(
                    "pointCount is {} but the document holds {} points",
                    record.point_count,
                    record.points.len()
                )),
            });
        }
        Ok(Some(record))
    }

    /// Overwrites the stored record for `key`.
    pub async fn write(&self, key: CommodityKey, record: &SeriesRecord) -> Result<(), StoreError> {
        let path = self.document_path(key);
        let doc = serde_json::to_value(record).map_err(StoreError::Encode)?;
        self.backend.set(&path, doc).await?;
        tracing::debug!(%path, points = record.point_count, "series record written");
        Ok(())
    }
}
