use crate::translation::service::TranslationService;
use crate::utils::BatchConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub backoff: Duration,
    pub exhausted_cooldown: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &BatchConfig) -> Self {
        Self {
            max_attempts: config.max_retries,
            backoff: config.retry_backoff(),
            exhausted_cooldown: config.exhausted_cooldown(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    Translated(String),
    Failed { attempts: usize, last_error: String },
}

impl ChunkOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, ChunkOutcome::Failed { .. })
    }

    /// Text to place in the output; failed chunks become `failure_marker`.
    pub fn into_text(self, failure_marker: &str) -> String {
        match self {
            ChunkOutcome::Translated(text) => text,
            ChunkOutcome::Failed { .. } => failure_marker.to_string(),
        }
    }
}

/// Wraps a [`TranslationService`] with fixed-interval retries.
pub struct ChunkTranslator {
    service: Arc<dyn TranslationService>,
    source_lang: String,
    target_lang: String,
    policy: RetryPolicy,
}

impl ChunkTranslator {
    pub fn new(
        service: Arc<dyn TranslationService>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            service,
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            policy,
        }
    }

    pub async fn translate(&self, chunk: &str) -> ChunkOutcome {
        let max_attempts = self.policy.max_attempts;
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            match self
                .service
                .translate(chunk, &self.source_lang, &self.target_lang)
                .await
            {
                Ok(text) => return ChunkOutcome::Translated(text),
                Err(e) => {
                    warn!(
                        service = self.service.name(),
                        attempt,
                        max_attempts,
                        error = %e,
                        "Chunk translation failed, retrying"
                    );
                    last_error = e.to_string();
                    tokio::time::sleep(self.policy.backoff).await;
                }
            }
        }

        error!(
            service = self.service.name(),
            attempts = max_attempts,
            chars = chunk.chars().count(),
            "Chunk translation failed after all attempts"
        );
        tokio::time::sleep(self.policy.exhausted_cooldown).await;

        ChunkOutcome::Failed {
            attempts: max_attempts,
            last_error,
        }
    }
}
