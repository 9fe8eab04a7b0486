use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use super::retry::RetryPolicy;
use super::traits::{Translator, TranslatorInfo};
use crate::config::{language_name, Lang};
use crate::error::{Error, Result};

/// OpenAI-compatible API translator
/// Works with: llama.cpp server, Ollama, DeepSeek, OpenAI, etc.
pub struct OpenAiTranslator {
    client: Client,
    /// Base URL for the API (e.g., "http://localhost:8080/v1")
    pub api_base: String,
    /// Optional API key for authentication
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    retry: RetryPolicy,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OpenAiTranslator {
    pub fn new(
        api_base: String,
        api_key: Option<String>,
        model: String,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::ConfigInvalid {
                field: "translator".to_string(),
                reason: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_base,
            api_key,
            model,
            retry,
        })
    }

    /// Create translation prompt
    fn create_prompt(text: &str, source: &Lang, target: &Lang) -> String {
        let source_hint = if source.is_auto() {
            String::new()
        } else {
            format!(" from {}", prompt_language_name(source))
        };
        format!(
            "Translate the following text{} into {}. Keep the line breaks. Output only the translation, no explanations.\n\nText: \"{}\"",
            source_hint,
            prompt_language_name(target),
            text
        )
    }

    async fn request_once(&self, text: &str, source: &Lang, target: &Lang) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: Self::create_prompt(text, source, target),
            }],
            temperature: Some(0.3), // Lower temperature for more consistent translations
        };

        let mut req = self.client.post(&url).json(&request);
        if let Some(ref key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {key}"));
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::TranslationTimeout
            } else {
                Error::TranslationRequest(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            warn!("Rate limited, retry after {:?}s", retry_after);
            return Err(Error::TranslationRateLimited { retry_after });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TranslationRequest(format!("HTTP {status}: {body}")));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::TranslationInvalidResponse(e.to_string()))?;

        chat_response
            .choices
            .first()
            .map(|choice| strip_wrapping_quotes(&choice.message.content))
            .ok_or_else(|| Error::TranslationInvalidResponse("No choices in response".to_string()))
    }
}

/// Remove quotes if the model wrapped the response in them
fn strip_wrapping_quotes(content: &str) -> String {
    content
        .trim()
        .trim_start_matches('"')
        .trim_end_matches('"')
        .to_string()
}

#[async_trait]
impl Translator for OpenAiTranslator {
    fn info(&self) -> TranslatorInfo {
        TranslatorInfo {
            name: "OpenAI Compatible",
            supports_auto_detect: true,
        }
    }

    async fn translate(&self, text: &str, source: &Lang, target: &Lang) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        if source == target && !source.is_auto() {
            return Ok(text.to_string());
        }

        self.retry
            .run("OpenAI translation request", || {
                self.request_once(text, source, target)
            })
            .await
    }
}

/// Language name for prompts; LLMs understand most ISO codes otherwise
fn prompt_language_name(lang: &Lang) -> &'static str {
    language_name(lang.as_str()).unwrap_or("the specified language")
}
