//! The persisted series document and the builder that produces it.
//!
//! A [`SeriesRecord`] is only ever built from a [`RawSeries`] that passed provider
//! validation, and it is replaced wholesale on each refresh. `fetched_at` is when
//! the record was built for writing, not the month of its newest point; freshness
//! is measured from it.

use chrono::{DateTime, Utc};
use commodity_ingestor::models::{
    data_point::DataPoint, interval::SeriesInterval, raw_series::RawSeries,
};
use serde::{Deserialize, Serialize};

use crate::{
    clock::SharedClock,
    retention::{RETENTION_LIMIT, RetentionError, trim},
};

/// Tag recorded in every document for the upstream it came from.
pub const DATA_SOURCE: &str = "Alpha Vantage";

/// Cached series document, as stored and as served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRecord {
    /// Human-readable series name.
    pub name: String,
    /// Unit of the values, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Sampling interval.
    pub interval_kind: SeriesInterval,
    /// Upstream the data came from.
    pub data_source: String,
    /// When this record was built for writing.
    pub fetched_at: DateTime<Utc>,
    /// Always `points.len()`.
    pub point_count: usize,
    /// Observations, newest first, at most the retention limit.
    pub points: Vec<DataPoint>,
}

impl SeriesRecord {
    /// Date of the newest point, if any.
    pub fn latest_date(&self) -> Option<&str> {
        self.points.first().map(|p| p.date.as_str())
    }
}

/// Turns validated provider output into a [`SeriesRecord`].
#[derive(Clone)]
pub struct DocumentBuilder {
    retention_limit: usize,
    clock: SharedClock,
}

impl DocumentBuilder {
    /// Builder with the default retention limit.
    pub fn new(clock: SharedClock) -> Self {
        Self {
            retention_limit: RETENTION_LIMIT,
            clock,
        }
    }

    /// Overrides the retention limit. Zero is rejected at build time.
    pub fn with_retention_limit(mut self, limit: usize) -> Self {
        self.retention_limit = limit;
        self
    }

    /// Configured retention limit.
    pub fn retention_limit(&self) -> usize {
        self.retention_limit
    }

    /// Trims the series and stamps it with the current time.
    pub fn build(&self, raw: RawSeries) -> Result<SeriesRecord, RetentionError> {
        let points = trim(raw.points, self.retention_limit)?;
        Ok(SeriesRecord {
            name: raw.name,
            unit: raw.unit,
            interval_kind: raw.interval,
            data_source: DATA_SOURCE.to_string(),
            fetched_at: self.clock.now(),
            point_count: points.len(),
            points,
        })
    }
}
