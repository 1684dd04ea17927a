pub mod chunk;
pub mod client;
pub mod google;
pub mod row;
pub mod service;
pub mod splitter;

#[cfg(test)]
pub(crate) mod testing;

pub use chunk::{ChunkOutcome, ChunkTranslator, RetryPolicy};
pub use client::AnthropicTranslator;
pub use google::GoogleTranslator;
pub use row::{Columns, RowOutcome, RowTranslator};
pub use service::TranslationService;
pub use splitter::TextSplitter;

use crate::utils::{
    config::ANTHROPIC_API_KEY_ENV, BatchConfig, Result, ServiceConfig, ServiceProvider,
    TranslatorError,
};
use std::sync::Arc;
use std::time::Duration;

pub fn build_service(config: &ServiceConfig) -> Result<Arc<dyn TranslationService>> {
    let timeout = Duration::from_secs(config.timeout_seconds);

    let service: Arc<dyn TranslationService> = match config.provider {
        ServiceProvider::Google => Arc::new(GoogleTranslator::new(config.endpoint.clone(), timeout)?),
        ServiceProvider::Anthropic => {
            let api_key = config.resolve_api_key().ok_or_else(|| {
                TranslatorError::ConfigError(format!(
                    "anthropic provider needs service.api_key or {}",
                    ANTHROPIC_API_KEY_ENV
                ))
            })?;
            Arc::new(AnthropicTranslator::new(
                config.endpoint.clone(),
                api_key,
                config.model.clone(),
                timeout,
            )?)
        }
    };

    tracing::info!(
        service = service.name(),
        source_lang = %config.source_lang,
        target_lang = %config.target_lang,
        "Translation service ready"
    );

    Ok(service)
}

/// Wires splitter, retry wrapper and service into a row translator.
pub fn build_row_translator(
    service: Arc<dyn TranslationService>,
    service_config: &ServiceConfig,
    batch_config: &BatchConfig,
) -> RowTranslator {
    let splitter = TextSplitter::new(
        batch_config.max_chunk_chars,
        batch_config.sentence_terminators.clone(),
    );
    let chunks = ChunkTranslator::new(
        service,
        service_config.source_lang.clone(),
        service_config.target_lang.clone(),
        RetryPolicy::from_config(batch_config),
    );
    RowTranslator::new(splitter, chunks, batch_config.failure_marker.clone())
}
