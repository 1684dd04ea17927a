use crate::translation::service::TranslationService;
use crate::utils::{Result, TranslatorError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value as JsonValue;
use std::time::Duration;

pub const DEFAULT_GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Client for the public Google Translate web endpoint. No key required.
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(endpoint: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_GOOGLE_ENDPOINT.to_string()),
        })
    }
}

#[async_trait]
impl TranslationService for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source_lang),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TranslatorError::RateLimited(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslatorError::ApiError(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let payload: JsonValue = response.json().await?;
        parse_segments(&payload)
    }

    fn name(&self) -> &str {
        "google"
    }
}

/// The response is a nested array; the first element holds
/// `[translated, original, ...]` segments in order.
pub(crate) fn parse_segments(payload: &JsonValue) -> Result<String> {
    let segments = payload
        .get(0)
        .and_then(|s| s.as_array())
        .ok_or_else(|| TranslatorError::ApiError("No segments in response".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|t| t.as_str()))
        .collect();

    if translated.is_empty() {
        return Err(TranslatorError::ApiError(
            "Empty translation in response".to_string(),
        ));
    }

    Ok(translated)
}
