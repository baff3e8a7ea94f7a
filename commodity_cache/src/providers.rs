//! Provider registry that maps configuration to a concrete upstream client.
use std::sync::Arc;

use commodity_ingestor::providers::{
    ProviderInitError, SeriesProvider, alpha_vantage::AlphaVantageProvider,
};

use crate::config::PipelineConfig;

/// Build the upstream provider described by `config`.
pub fn build_provider(
    config: &PipelineConfig,
) -> Result<Arc<dyn SeriesProvider>, ProviderInitError> {
    let provider = AlphaVantageProvider::with_endpoint(&config.base_url, config.request_timeout())?;
    Ok(Arc::new(provider))
}
