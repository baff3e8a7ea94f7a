//! A validated series as returned by a [`SeriesProvider`](crate::providers::SeriesProvider).

use crate::models::{commodity::CommodityKey, data_point::DataPoint, interval::SeriesInterval};

/// Complete series for one commodity, straight from the provider.
///
/// Only ever constructed after the upstream payload passed shape validation, so
/// every field is populated. `points` is newest-first and untrimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSeries {
    /// The commodity this data represents.
    pub key: CommodityKey,
    /// Human-readable series name reported by the provider.
    pub name: String,
    /// Unit of `value` (e.g. "dollars per barrel"). Not all series report one.
    pub unit: Option<String>,
    /// Sampling interval that was requested.
    pub interval: SeriesInterval,
    /// Observations, newest first.
    pub points: Vec<DataPoint>,
}
