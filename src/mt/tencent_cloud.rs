//! Tencent Cloud Machine Translation (TMT) provider
//!
//! Calls the `TextTranslate` action of API version `2018-03-21`. Every request is
//! signed with TC3-HMAC-SHA256:
//!
//! 1. canonical request over method, path, signed headers and the payload hash
//! 2. string-to-sign = algorithm, timestamp, credential scope, hash of (1)
//! 3. signing key = HMAC chain `"TC3" + secret_key` → date → service → `tc3_request`

use crate::mt::error::{TranslationError, TranslationResult};
use crate::mt::translator::{MachineTranslator, normalize_locale, validate_locale};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use std::time::Duration;

type HmacSha256 = Hmac<Sha256>;

const SERVICE: &str = "tmt";
const HOST: &str = "tmt.tencentcloudapi.com";
const ACTION: &str = "TextTranslate";
const VERSION: &str = "2018-03-21";
const ALGORITHM: &str = "TC3-HMAC-SHA256";
const CONTENT_TYPE: &str = "application/json; charset=utf-8";

pub const DEFAULT_REGION: &str = "ap-guangzhou";

#[derive(Clone)]
pub struct TencentCloudTranslator {
    secret_id: String,
    secret_key: String,
    region: String,
    client: reqwest::Client,
}

impl TencentCloudTranslator {
    pub fn new(secret_id: String, secret_key: String, region: String) -> TranslationResult<Self> {
        if secret_id.trim().is_empty() || secret_key.trim().is_empty() {
            return Err(TranslationError::Config(
                "Tencent Cloud secret id and secret key are required".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| TranslationError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            secret_id,
            secret_key,
            region,
            client,
        })
    }

    /// Build the `Authorization` header value for a payload sent at `timestamp`
    pub fn authorization(&self, payload: &str, timestamp: i64) -> TranslationResult<String> {
        let date = chrono::DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| TranslationError::Config(format!("invalid timestamp {}", timestamp)))?
            .format("%Y-%m-%d")
            .to_string();
        let scope = format!("{}/{}/tc3_request", date, SERVICE);
        let string_to_sign = string_to_sign(payload, timestamp, &scope);
        let signature = signature(&self.secret_key, &date, &string_to_sign)?;

        Ok(format!(
            "{} Credential={}/{}, SignedHeaders=content-type;host, Signature={}",
            ALGORITHM, self.secret_id, scope, signature
        ))
    }
}

fn sha256_hex(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}

fn hmac_sha256(key: &[u8], data: &str) -> TranslationResult<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| TranslationError::Config(format!("invalid signing key: {}", e)))?;
    mac.update(data.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

fn canonical_request(payload: &str) -> String {
    format!(
        "POST\n/\n\ncontent-type:{}\nhost:{}\n\ncontent-type;host\n{}",
        CONTENT_TYPE,
        HOST,
        sha256_hex(payload)
    )
}

fn string_to_sign(payload: &str, timestamp: i64, scope: &str) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        timestamp,
        scope,
        sha256_hex(&canonical_request(payload))
    )
}

fn signature(secret_key: &str, date: &str, string_to_sign: &str) -> TranslationResult<String> {
    let secret_date = hmac_sha256(format!("TC3{}", secret_key).as_bytes(), date)?;
    let secret_service = hmac_sha256(&secret_date, SERVICE)?;
    let secret_signing = hmac_sha256(&secret_service, "tc3_request")?;
    Ok(hex::encode(hmac_sha256(&secret_signing, string_to_sign)?))
}

fn parse_response(body: &Value) -> TranslationResult<String> {
    let response = body
        .get("Response")
        .ok_or_else(|| TranslationError::InvalidResponse("missing 'Response'".to_string()))?;

    if let Some(error) = response.get("Error") {
        let code = error["Code"].as_str().unwrap_or("Unknown");
        let message = error["Message"].as_str().unwrap_or_default();
        return Err(TranslationError::provider(
            "Tencent Cloud",
            format!("{}: {}", code, message),
        ));
    }

    response["TargetText"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| TranslationError::InvalidResponse("missing 'TargetText'".to_string()))
}

impl std::fmt::Debug for TencentCloudTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TencentCloudTranslator")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"***")
            .field("region", &self.region)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for TencentCloudTranslator {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> TranslationResult<String> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        let source = if source_locale == "auto" {
            "auto".to_string()
        } else {
            normalize_locale(source_locale)
        };
        let payload = json!({
            "SourceText": text,
            "Source": source,
            "Target": normalize_locale(target_locale),
            "ProjectId": 0
        })
        .to_string();
        let timestamp = chrono::Utc::now().timestamp();
        let authorization = self.authorization(&payload, timestamp)?;

        let response = self
            .client
            .post(format!("https://{}", HOST))
            .header("Authorization", authorization)
            .header("Content-Type", CONTENT_TYPE)
            .header("Host", HOST)
            .header("X-TC-Action", ACTION)
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("X-TC-Version", VERSION)
            .header("X-TC-Region", &self.region)
            .body(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TranslationError::provider(
                self.provider_name(),
                format!("request failed with status {}", response.status()),
            ));
        }

        let body: Value = response.json().await?;
        parse_response(&body)
    }

    fn provider_name(&self) -> &str {
        "Tencent Cloud"
    }
}
