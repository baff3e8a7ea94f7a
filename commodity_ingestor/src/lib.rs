//! Upstream side of the commodity pipeline: the closed set of commodity keys,
//! the series data model, and the [`providers::SeriesProvider`] seam with its
//! Alpha Vantage implementation.

pub mod models;
pub mod providers;
