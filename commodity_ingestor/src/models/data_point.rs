//! One observation of a commodity series.
//!
//! Values are kept exactly as the provider sent them. Alpha Vantage uses `"."`
//! for months it has no value for, so parsing into a number is left to consumers.

use serde::{Deserialize, Serialize};

/// A single monthly observation.
///
/// Series are ordered newest-first, the way the provider returns them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Calendar month of the observation (`YYYY-MM-DD`, first of month).
    pub date: String,

    /// Decimal value as a string.
    pub value: String,
}

impl DataPoint {
    pub fn new(date: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            value: value.into(),
        }
    }
}
