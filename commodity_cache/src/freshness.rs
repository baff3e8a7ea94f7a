//! Freshness policy for cached series.
//!
//! A record is servable while it was *fetched* recently enough. Only `fetchedAt`
//! is consulted; the dates of the points themselves play no part.

use chrono::{DateTime, Utc};

use crate::record::SeriesRecord;

/// Default maximum age, in whole days, of a servable record.
pub const DEFAULT_THRESHOLD_DAYS: u32 = 7;

const SECONDS_PER_DAY: i64 = 86_400;

/// Decides whether a stored record can be served without refetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    threshold_days: u32,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD_DAYS)
    }
}

impl FreshnessPolicy {
    /// Policy with the given threshold in days.
    pub const fn new(threshold_days: u32) -> Self {
        Self { threshold_days }
    }

    /// Configured threshold in days.
    pub const fn threshold_days(&self) -> u32 {
        self.threshold_days
    }

    /// `true` when `record` exists, has points, and is younger than the threshold.
    ///
    /// Age is truncated to whole days, so 6 days 23 hours counts as 6; a record
    /// exactly `threshold_days` old is stale.
    pub fn is_fresh(&self, record: Option<&SeriesRecord>, now: DateTime<Utc>) -> bool {
        let Some(record) = record else {
            return false;
        };
        if record.points.is_empty() {
            return false;
        }
        age_days(record, now) < i64::from(self.threshold_days)
    }
}

/// Whole days elapsed since `record` was fetched, truncated toward zero.
pub fn age_days(record: &SeriesRecord, now: DateTime<Utc>) -> i64 {
    (now - record.fetched_at).num_seconds() / SECONDS_PER_DAY
}
