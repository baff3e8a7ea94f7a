//! Alpha Vantage commodities endpoint.
//!
//! One GET per commodity with `function=<KEY>&interval=monthly&apikey=<KEY>`.
//! The response is a JSON object with `name`, `interval`, `unit` and a newest-first
//! `data` array of `{date, value}` objects.

pub mod params;
pub mod provider;
pub mod response;

pub use provider::AlphaVantageProvider;
