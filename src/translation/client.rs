use crate::translation::service::TranslationService;
use crate::utils::{Result, TranslatorError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";

pub struct AnthropicTranslator {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: usize,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

impl AnthropicTranslator {
    pub fn new(
        endpoint: Option<String>,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ANTHROPIC_ENDPOINT.to_string()),
            api_key,
            model,
        })
    }

    async fn call_api(&self, prompt: &str) -> Result<String> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: 4096,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: Some(0.0),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request)
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

        let api_response: AnthropicResponse = response.json().await?;
        extract_text(api_response)
    }
}

#[async_trait]
impl TranslationService for AnthropicTranslator {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }
        let prompt = build_translation_prompt(text, source_lang, target_lang);
        let translated = self.call_api(&prompt).await?;
        Ok(translated.trim().to_string())
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

fn build_translation_prompt(text: &str, source_lang: &str, target_lang: &str) -> String {
    let mut prompt = String::new();

    if source_lang == "auto" {
        prompt.push_str(&format!(
            "You are a professional patent translator. Detect the language of the following text and translate it to {}.\n",
            target_lang
        ));
    } else {
        prompt.push_str(&format!(
            "You are a professional patent translator. Translate the following text from {} to {}.\n",
            source_lang, target_lang
        ));
    }

    prompt.push_str("Keep claim numbering, reference signs and formulas unchanged.\n");
    prompt.push_str("Output ONLY the translation, no explanations or markdown formatting.\n\n");
    prompt.push_str(text);

    prompt
}

fn extract_text(response: AnthropicResponse) -> Result<String> {
    response
        .content
        .into_iter()
        .find_map(|block| {
            if block.content_type == "text" {
                block.text
            } else {
                None
            }
        })
        .ok_or_else(|| TranslatorError::ApiError("No text content in response".to_string()))
}
