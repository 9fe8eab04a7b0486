use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

use super::retry::RetryPolicy;
use super::traits::{Translator, TranslatorInfo};
use crate::config::Lang;
use crate::error::{Error, Result};

/// Google Translate via the public `translate_a/single` web endpoint.
///
/// No API key is needed. The service caps request length, which is why
/// callers go through the chunking pipeline.
pub struct GoogleTranslator {
    client: Client,
    /// Base URL (e.g., "https://translate.googleapis.com")
    pub api_base: String,
    retry: RetryPolicy,
}

impl GoogleTranslator {
    pub fn new(api_base: String, retry: RetryPolicy, timeout: Duration) -> Result<Self> {
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
            retry,
        })
    }

    async fn request_once(&self, text: &str, source: &Lang, target: &Lang) -> Result<String> {
        let url = format!("{}/translate_a/single", self.api_base.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source.as_str()),
                ("tl", target.as_str()),
                ("dt", "t"),
            ])
            .form(&[("q", text)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::TranslationTimeout
                } else {
                    Error::TranslationRequest(e.to_string())
                }
            })?;

        let response = check_status(response).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::TranslationInvalidResponse(e.to_string()))?;

        parse_response(&body)
    }
}

/// Map HTTP error statuses onto translation errors
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        warn!("Rate limited, retry after {:?}s", retry_after);
        return Err(Error::TranslationRateLimited { retry_after });
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::TranslationRequest(format!("HTTP {status}: {body}")))
}

/// Extract the translation from a `translate_a/single` response.
///
/// The body is `[[["translated", "original", ...], ...], ...]`; long input
/// comes back as several sentence fragments that are concatenated.
fn parse_response(body: &Value) -> Result<String> {
    let fragments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            Error::TranslationInvalidResponse("missing translation fragments".to_string())
        })?;

    let translated: String = fragments
        .iter()
        .filter_map(|fragment| fragment.get(0).and_then(Value::as_str))
        .collect();

    if translated.is_empty() {
        return Err(Error::TranslationInvalidResponse(
            "response contained no translated text".to_string(),
        ));
    }

    Ok(translated)
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn info(&self) -> TranslatorInfo {
        TranslatorInfo {
            name: "Google Translate",
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
            .run("Google translation request", || {
                self.request_once(text, source, target)
            })
            .await
    }
}
