//! Retention window for stored series.
//!
//! Series arrive newest-first, so keeping the most recent `limit` months is a
//! prefix of the input. Trimming never reorders.

use commodity_ingestor::models::data_point::DataPoint;

/// Maximum number of monthly points kept per series.
pub const RETENTION_LIMIT: usize = 60;

/// Errors raised by [`trim`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RetentionError {
    /// A zero limit would silently erase every series.
    #[error("retention limit must be at least 1, got {0}")]
    InvalidLimit(usize),
}

/// Keeps the first `limit` points of a newest-first series.
///
/// Returns the input untouched when it already fits.
pub fn trim(mut points: Vec<DataPoint>, limit: usize) -> Result<Vec<DataPoint>, RetentionError> {
    if limit == 0 {
        return Err(RetentionError::InvalidLimit(limit));
    }
    points.truncate(limit);
    Ok(points)
}
