//! Tencent TranSmart web endpoint
//!
//! The endpoint behind the TranSmart web page. It needs no credentials but
//! expects a browser-like request and a client key of the form
//! `browser-chrome-131.0.0-Mac_OS-<uuid>-<millis>`, generated once per translator.

use crate::mt::error::{TranslationError, TranslationResult};
use crate::mt::translator::{MachineTranslator, validate_locale};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, ORIGIN};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

const TRANSMART_URL: &str = "https://transmart.qq.com/api/imt";
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct TencentTranslator {
    client: reqwest::Client,
    base_url: String,
    client_key: String,
}

impl TencentTranslator {
    pub fn new() -> TranslationResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
        );
        headers.insert(ORIGIN, HeaderValue::from_static("https://transmart.qq.com"));
        headers.insert(
            "X-Requested-With",
            HeaderValue::from_static("XMLHttpRequest"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| TranslationError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: TRANSMART_URL.to_string(),
            client_key: Self::generate_client_key(),
        })
    }

    fn generate_client_key() -> String {
        format!(
            "browser-chrome-131.0.0-Mac_OS-{}-{}",
            uuid::Uuid::new_v4(),
            chrono::Utc::now().timestamp_millis()
        )
    }

    pub fn client_key(&self) -> &str {
        &self.client_key
    }

    fn request_body(&self, text: &str, source_locale: &str, target_locale: &str) -> Value {
        json!({
            "header": {
                "fn": "auto_translation",
                "session": "",
                "client_key": self.client_key,
                "user": ""
            },
            "type": "plain",
            "model_category": "normal",
            "text_domain": "general",
            "source": {
                "lang": source_locale,
                "text_list": [text]
            },
            "target": {
                "lang": target_locale
            }
        })
    }
}

fn parse_response(success: bool, body: &Value) -> TranslationResult<String> {
    let has_error = body.get("error").is_some_and(|e| !e.is_null());
    let translations = body.get("auto_translation").and_then(Value::as_array);

    match translations {
        Some(list) if success && !has_error => Ok(list
            .first()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()),
        _ => {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("translation request failed");
            Err(TranslationError::provider("Tencent", message))
        }
    }
}

#[async_trait]
impl MachineTranslator for TencentTranslator {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> TranslationResult<String> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        debug!(text, "Tencent translating");
        let referer = format!(
            "https://transmart.qq.com/zh-CN/index?sourcelang={}&targetlang={}",
            source_locale, target_locale
        );
        let response = self
            .client
            .post(&self.base_url)
            .header(reqwest::header::REFERER, referer)
            .json(&self.request_body(text, source_locale, target_locale))
            .send()
            .await?;

        let success = response.status().is_success();
        let body: Value = response.json().await?;
        let result = parse_response(success, &body)?;
        debug!(result = %result, "Tencent translation result");
        Ok(result)
    }

    fn provider_name(&self) -> &str {
        "Tencent"
    }
}
