//! Google Translate provider for machine translation
//!
//! Two transports are supported:
//!
//! - With an API key, the Cloud Translation API v2 (`translation.googleapis.com`).
//! - Without one, the public `gtx` web endpoint used by browser extensions.
//!
//! Both go through a small transport retry loop: every attempt is bounded by
//! [`GoogleTranslateProvider::REQUEST_TIMEOUT`] and failed attempts back off
//! linearly (1s, 2s, ...). This loop sits inside the pipeline's per-key retry.
//!
//! # Example
//!
//! ```ignore
//! use i18n_autotranslate::mt::{MachineTranslator, GoogleTranslateProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::web()?;
//!     let result = provider.translate("Hello, world!", "en", "ar").await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

use crate::mt::error::{TranslationError, TranslationResult};
use crate::mt::translator::{MachineTranslator, normalize_locale, validate_locale};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

const CLOUD_URL: &str = "https://translation.googleapis.com/language/translate/v2";
const WEB_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Google Translate provider
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    /// API key for the v2 API; `None` selects the web endpoint
    api_key: Option<String>,
    /// HTTP client for async requests
    client: reqwest::Client,
    base_url: String,
    /// Attempts per request at the transport level
    attempts: usize,
    /// Unit of the linear backoff between transport attempts
    backoff: Duration,
}

impl GoogleTranslateProvider {
    /// Maximum characters per string (30KB per Google Translate API limits)
    const MAX_CHARS_PER_STRING: usize = 30_000;

    /// Per-attempt timeout
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Transport attempts per request
    pub const TRANSPORT_ATTEMPTS: usize = 3;

    /// Create a provider for the Cloud Translation v2 API with an explicit API key
    ///
    /// # Errors
    ///
    /// * `TranslationError::Config` - If API key is empty or HTTP client creation fails
    pub fn new(api_key: String) -> TranslationResult<Self> {
        if api_key.trim().is_empty() {
            return Err(TranslationError::Config(
                "API key cannot be empty".to_string(),
            ));
        }
        Self::build(Some(api_key), CLOUD_URL)
    }

    /// Create a provider for the keyless web endpoint
    pub fn web() -> TranslationResult<Self> {
        Self::build(None, WEB_URL)
    }

    fn build(api_key: Option<String>, base_url: &str) -> TranslationResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent("Mozilla/5.0")
            .build()
            .map_err(|e| TranslationError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            client,
            base_url: base_url.to_string(),
            attempts: Self::TRANSPORT_ATTEMPTS,
            backoff: Duration::from_secs(1),
        })
    }

    /// Send a request, retrying transport failures with linear backoff
    async fn send_with_retry<F>(&self, build: F) -> TranslationResult<reqwest::Response>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut last_error = TranslationError::Network("no attempt made".to_string());
        for attempt in 0..self.attempts {
            match build().send().await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    last_error = err.into();
                    debug!(attempt = attempt + 1, error = %last_error, "Google request failed");
                    if attempt + 1 < self.attempts {
                        tokio::time::sleep(self.backoff * (attempt as u32 + 1)).await;
                    }
                }
            }
        }
        Err(last_error)
    }

    async fn translate_cloud(
        &self,
        api_key: &str,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> TranslationResult<String> {
        let url = format!("{}?key={}", self.base_url, api_key);
        let mut body = json!({
            "q": [text],
            "target": normalize_locale(target_locale),
            "format": "text"
        });
        // v2 detects the source language when it is omitted
        if source_locale != "auto" {
            body["source"] = Value::String(normalize_locale(source_locale));
        }

        let response = self
            .send_with_retry(|| self.client.post(&url).json(&body))
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(status_error(self.provider_name(), status, &error_text));
        }

        let json: Value = response.json().await?;
        parse_cloud_response(&json)
    }

    async fn translate_web(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> TranslationResult<String> {
        let sl = if source_locale == "auto" {
            "auto".to_string()
        } else {
            normalize_locale(source_locale)
        };
        let tl = normalize_locale(target_locale);
        let query = [
            ("client", "gtx"),
            ("sl", sl.as_str()),
            ("tl", tl.as_str()),
            ("dt", "t"),
            ("q", text),
        ];

        let response = self
            .send_with_retry(|| self.client.get(&self.base_url).query(&query))
            .await?;

        if !response.status().is_success() {
            return Err(TranslationError::provider(
                self.provider_name(),
                format!("request failed with status {}", response.status()),
            ));
        }

        let json: Value = response.json().await?;
        parse_web_response(&json)
    }
}

/// Reject text longer than `limit` characters (not bytes)
fn check_length(text: &str, limit: usize) -> TranslationResult<()> {
    let length = text.chars().count();
    if length > limit {
        return Err(TranslationError::TextTooLong { length, limit });
    }
    Ok(())
}

/// Classify a non-2xx answer from the v2 API.
///
/// Only credential and request problems (400, 401, 403) are configuration errors;
/// rate limiting and everything else is a provider error the caller may retry.
fn status_error(provider: &str, status: reqwest::StatusCode, body: &str) -> TranslationError {
    match status.as_u16() {
        400 | 401 | 403 => {
            TranslationError::Config(format!("API client error ({}): {}", status, body))
        }
        _ => TranslationError::provider(provider, format!("API error ({}): {}", status, body)),
    }
}

/// Extract `data.translations[0].translatedText` from a v2 response
fn parse_cloud_response(json: &Value) -> TranslationResult<String> {
    let translations = json["data"]["translations"].as_array().ok_or_else(|| {
        TranslationError::InvalidResponse("missing 'data.translations' array".to_string())
    })?;

    translations
        .first()
        .and_then(|t| t["translatedText"].as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| TranslationError::InvalidResponse("missing 'translatedText' field".to_string()))
}

/// The web endpoint answers `[[["مرحبا","Hello",...], ...], null, "en", ...]`;
/// the translation is the concatenation of every segment's first string.
fn parse_web_response(json: &Value) -> TranslationResult<String> {
    let segments = json
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslationError::InvalidResponse("missing segment array".to_string()))?;

    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect())
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateProvider")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for GoogleTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> TranslationResult<String> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        if text.is_empty() {
            return Ok(String::new());
        }

        check_length(text, Self::MAX_CHARS_PER_STRING)?;

        match &self.api_key {
            Some(key) => {
                self.translate_cloud(key, text, source_locale, target_locale)
                    .await
            }
            None => self.translate_web(text, source_locale, target_locale).await,
        }
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}
