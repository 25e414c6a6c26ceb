//! Baidu Fanyi provider
//!
//! Requests are form-encoded and signed with `md5(appid + q + salt + secret)`.
//! Baidu uses its own language codes for a few languages; Arabic is `ara`.

use crate::mt::error::{TranslationError, TranslationResult};
use crate::mt::translator::{MachineTranslator, normalize_locale, validate_locale};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const BAIDU_URL: &str = "https://fanyi-api.baidu.com/api/trans/vip/translate";

#[derive(Clone)]
pub struct BaiduTranslator {
    app_id: String,
    secret: String,
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct BaiduResponse {
    error_code: Option<serde_json::Value>,
    error_msg: Option<String>,
    trans_result: Option<Vec<BaiduSegment>>,
}

#[derive(Debug, Deserialize)]
struct BaiduSegment {
    dst: String,
}

impl BaiduTranslator {
    pub fn new(app_id: String, secret: String) -> TranslationResult<Self> {
        if app_id.trim().is_empty() || secret.trim().is_empty() {
            return Err(TranslationError::Config(
                "Baidu app id and secret are required".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| TranslationError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            app_id,
            secret,
            client,
            base_url: BAIDU_URL.to_string(),
        })
    }

    /// Request signature as documented by Baidu
    pub fn sign(app_id: &str, text: &str, salt: &str, secret: &str) -> String {
        format!("{:x}", md5::compute(format!("{}{}{}{}", app_id, text, salt, secret)))
    }

    /// Map a BCP 47-ish code to Baidu's code set
    pub fn baidu_locale(locale: &str) -> String {
        match normalize_locale(locale).as_str() {
            "ar" => "ara".to_string(),
            "fr" => "fra".to_string(),
            "es" => "spa".to_string(),
            "ja" => "jp".to_string(),
            "ko" => "kor".to_string(),
            other => other.to_string(),
        }
    }
}

fn parse_response(body: BaiduResponse) -> TranslationResult<String> {
    if let Some(code) = body.error_code {
        let code = match code {
            serde_json::Value::String(code) => code,
            other => other.to_string(),
        };
        let message = body.error_msg.unwrap_or_default();
        return Err(TranslationError::provider(
            "Baidu",
            format!("{} {}", code, message).trim().to_string(),
        ));
    }

    body.trans_result
        .and_then(|segments| segments.into_iter().next())
        .map(|segment| segment.dst)
        .ok_or_else(|| TranslationError::InvalidResponse("missing 'trans_result'".to_string()))
}

impl std::fmt::Debug for BaiduTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaiduTranslator")
            .field("app_id", &self.app_id)
            .field("secret", &"***")
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for BaiduTranslator {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> TranslationResult<String> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        let salt = chrono::Utc::now().timestamp_millis().to_string();
        let sign = Self::sign(&self.app_id, text, &salt, &self.secret);
        let from = Self::baidu_locale(source_locale);
        let to = Self::baidu_locale(target_locale);
        let form = [
            ("q", text),
            ("from", from.as_str()),
            ("to", to.as_str()),
            ("appid", self.app_id.as_str()),
            ("salt", salt.as_str()),
            ("sign", sign.as_str()),
        ];

        let response = self.client.post(&self.base_url).form(&form).send().await?;
        if !response.status().is_success() {
            return Err(TranslationError::provider(
                self.provider_name(),
                format!("request failed with status {}", response.status()),
            ));
        }

        parse_response(response.json().await?)
    }

    fn provider_name(&self) -> &str {
        "Baidu"
    }
}
