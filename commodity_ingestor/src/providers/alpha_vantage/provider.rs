use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use snafu::ResultExt;

use crate::{
    models::{commodity::CommodityKey, interval::SeriesInterval, raw_series::RawSeries},
    providers::{
        ApiKey, ClientBuildSnafu, ProviderError, ProviderInitError, ReqwestSnafu,
        SeriesProvider, UpstreamStatusSnafu,
        alpha_vantage::{
            params::{BASE_URL, construct_params},
            response::parse_series,
        },
    },
};

/// Default per-request timeout. A timeout surfaces as that key's failure.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upstream error bodies are cut to this many bytes before they reach errors and logs.
pub const MAX_ERROR_BODY_BYTES: usize = 512;

pub struct AlphaVantageProvider {
    client: Client,
    base_url: String,
}

impl AlphaVantageProvider {
    /// Creates a provider against the public endpoint with the default timeout.
    pub fn new() -> Result<Self, ProviderInitError> {
        Self::with_endpoint(BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Creates a provider against `base_url` (a proxy or test server) with a per-request timeout.
    pub fn with_endpoint(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderInitError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SeriesProvider for AlphaVantageProvider {
    async fn fetch_series(
        &self,
        key: CommodityKey,
        api_key: &ApiKey,
    ) -> Result<RawSeries, ProviderError> {
        let interval = SeriesInterval::Monthly;
        let query_params = construct_params(key, interval, api_key);

        tracing::debug!(commodity = %key, %interval, "requesting upstream series");
        let response = self
            .client
            .get(&self.base_url)
            .query(&query_params)
            .send()
            .await
            .context(ReqwestSnafu)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return UpstreamStatusSnafu {
                status: status.as_u16(),
                body: truncate_body(body),
            }
            .fail();
        }

        let body = response.text().await.context(ReqwestSnafu)?;
        let series = parse_series(key, interval, &body)?;

        tracing::debug!(
            commodity = %key,
            points = series.points.len(),
            "upstream series validated"
        );
        Ok(series)
    }
}

/// Cuts `body` to [`MAX_ERROR_BODY_BYTES`] on a char boundary, marking the cut with `...`.
fn truncate_body(mut body: String) -> String {
    if body.len() <= MAX_ERROR_BODY_BYTES {
        return body;
    }
    let mut end = MAX_ERROR_BODY_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body.truncate(end);
    body.push_str("...");
    body
}
