use crate::{
    models::{commodity::CommodityKey, interval::SeriesInterval},
    providers::ApiKey,
};

/// Default query endpoint.
pub const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Builds the fixed-shape query for one commodity.
///
/// The commodity key selects the upstream `function`; nothing else varies per call.
pub fn construct_params(
    key: CommodityKey,
    interval: SeriesInterval,
    api_key: &ApiKey,
) -> Vec<(&'static str, String)> {
    vec![
        ("function", key.as_str().to_string()),
        ("interval", interval.as_str().to_string()),
        ("apikey", api_key.expose_secret().to_string()),
    ]
}
