//! The closed set of commodities the pipeline knows how to serve.
//!
//! A [`CommodityKey`]'s upstream string (e.g. `"NATURAL_GAS"`) is used both as the
//! provider's `function` query parameter and as the storage key, so the mapping
//! between the enum and its string must stay one-to-one.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of one commodity series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommodityKey {
    /// West Texas Intermediate crude oil.
    Wti,
    /// Brent crude oil.
    Brent,
    /// Henry Hub natural gas.
    NaturalGas,
    /// Global copper price.
    Copper,
    /// Global aluminum price.
    Aluminum,
    /// Global wheat price.
    Wheat,
    /// Global corn price.
    Corn,
    /// Global cotton price.
    Cotton,
    /// Global sugar price.
    Sugar,
    /// Global coffee price.
    Coffee,
    /// Global price index of all commodities.
    AllCommodities,
}

/// Broad grouping of a commodity, used for display and listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommodityCategory {
    Energy,
    Metals,
    Grains,
    Softs,
    Index,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown commodity key: {0:?}")]
pub struct ParseCommodityError(pub String);

impl CommodityKey {
    /// Every key, in declaration order.
    pub const ALL: [CommodityKey; 11] = [
        CommodityKey::Wti,
        CommodityKey::Brent,
        CommodityKey::NaturalGas,
        CommodityKey::Copper,
        CommodityKey::Aluminum,
        CommodityKey::Wheat,
        CommodityKey::Corn,
        CommodityKey::Cotton,
        CommodityKey::Sugar,
        CommodityKey::Coffee,
        CommodityKey::AllCommodities,
    ];

    /// Key served when a request names no commodity, or one we don't recognize.
    pub const FALLBACK: CommodityKey = CommodityKey::Wti;

    /// Upstream identifier, also used as the storage key.
    pub const fn as_str(&self) -> &'static str {
        match self {
            CommodityKey::Wti => "WTI",
            CommodityKey::Brent => "BRENT",
            CommodityKey::NaturalGas => "NATURAL_GAS",
            CommodityKey::Copper => "COPPER",
            CommodityKey::Aluminum => "ALUMINUM",
            CommodityKey::Wheat => "WHEAT",
            CommodityKey::Corn => "CORN",
            CommodityKey::Cotton => "COTTON",
            CommodityKey::Sugar => "SUGAR",
            CommodityKey::Coffee => "COFFEE",
            CommodityKey::AllCommodities => "ALL_COMMODITIES",
        }
    }

    pub const fn category(&self) -> CommodityCategory {
        match self {
            CommodityKey::Wti | CommodityKey::Brent | CommodityKey::NaturalGas => {
                CommodityCategory::Energy
            }
            CommodityKey::Copper | CommodityKey::Aluminum => CommodityCategory::Metals,
            CommodityKey::Wheat | CommodityKey::Corn => CommodityCategory::Grains,
            CommodityKey::Cotton | CommodityKey::Sugar | CommodityKey::Coffee => {
                CommodityCategory::Softs
            }
            CommodityKey::AllCommodities => CommodityCategory::Index,
        }
    }

    /// Parses `raw`, falling back to [`CommodityKey::FALLBACK`] when it is absent
    /// or unrecognized.
    pub fn parse_or_fallback(raw: Option<&str>) -> CommodityKey {
        raw.and_then(|s| s.parse().ok()).unwrap_or(Self::FALLBACK)
    }
}

impl fmt::Display for CommodityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommodityKey {
    type Err = ParseCommodityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CommodityKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseCommodityError(s.to_string()))
    }
}
