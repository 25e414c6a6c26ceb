//! LibreTranslate provider
//!
//! Public LibreTranslate mirrors come and go, so the provider holds a list of
//! servers and tries them in order until one answers.

use crate::mt::error::{TranslationError, TranslationResult};
use crate::mt::translator::{MachineTranslator, normalize_locale, validate_locale};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Mirrors tried when no server list is configured
pub const DEFAULT_SERVERS: &[&str] = &[
    "https://translate.terraprint.co",
    "https://translate.fortytwo-it.com",
    "https://translate.api.skitzen.com",
    "https://translate.argosopentech.com",
];

#[derive(Debug, Clone)]
pub struct LibreTranslator {
    servers: Vec<String>,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct LibreRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct LibreResponse {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
    error: Option<String>,
}

impl LibreTranslator {
    pub fn new(servers: Vec<String>, api_key: Option<String>) -> TranslationResult<Self> {
        let servers = if servers.is_empty() {
            DEFAULT_SERVERS.iter().map(|s| s.to_string()).collect()
        } else {
            servers
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| TranslationError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            servers,
            api_key,
            client,
        })
    }

    async fn translate_on(
        &self,
        server: &str,
        request: &LibreRequest<'_>,
    ) -> TranslationResult<String> {
        let url = format!("{}/translate", server.trim_end_matches('/'));
        let response = self.client.post(url).json(request).send().await?;
        let success = response.status().is_success();
        let body: LibreResponse = response.json().await?;

        if !success {
            return Err(TranslationError::provider(
                "LibreTranslate",
                body.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        body.translated_text
            .ok_or_else(|| TranslationError::InvalidResponse("missing 'translatedText'".to_string()))
    }
}

#[async_trait]
impl MachineTranslator for LibreTranslator {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> TranslationResult<String> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        let source = normalize_locale(source_locale);
        let target = normalize_locale(target_locale);
        let request = LibreRequest {
            q: text,
            source: &source,
            target: &target,
            api_key: self.api_key.as_deref(),
        };

        let mut last_error = None;
        for server in &self.servers {
            match self.translate_on(server, &request).await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    warn!(server = %server, error = %err, "LibreTranslate server failed, trying next");
                    last_error = Some(err);
                }
            }
        }

        Err(TranslationError::provider(
            self.provider_name(),
            format!(
                "all servers failed: {}",
                last_error.map(|e| e.to_string()).unwrap_or_default()
            ),
        ))
    }

    fn provider_name(&self) -> &str {
        "LibreTranslate"
    }
}
