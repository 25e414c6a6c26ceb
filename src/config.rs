//! Runtime configuration
//!
//! Loaded from an optional TOML file, then overridden by environment variables.
//! Provider credentials live here and are handed to the provider constructors
//! explicitly; nothing reads credentials from ambient state afterwards.
//!
//! ```toml
//! provider = "baidu"
//! target_locale = "ar"
//!
//! [baidu]
//! app_id = "2015063000000001"
//! secret = "12345678"
//!
//! [pipeline]
//! batch_size = 3
//! max_retries = 5
//!
//! [output]
//! format = "json"
//! ```

use crate::codec::FileFormat;
use crate::error::{Error, Result};
use crate::mt::libre::DEFAULT_SERVERS;
use crate::mt::tencent_cloud::DEFAULT_REGION;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// The closed set of translation backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    Google,
    Baidu,
    /// TranSmart web endpoint, no credentials needed
    #[default]
    Tencent,
    /// Signed Tencent Cloud TMT API
    TencentCloud,
    Libre,
    Mock,
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(Provider::Google),
            "baidu" => Ok(Provider::Baidu),
            "tencent" => Ok(Provider::Tencent),
            "tencent-cloud" | "tencent_cloud" => Ok(Provider::TencentCloud),
            "libre" | "libretranslate" => Ok(Provider::Libre),
            "mock" => Ok(Provider::Mock),
            other => Err(Error::Config(format!("unknown provider '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    /// Cloud Translation v2 key; the keyless web endpoint is used without it
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BaiduConfig {
    pub app_id: Option<String>,
    pub secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TencentCloudConfig {
    pub secret_id: Option<String>,
    pub secret_key: Option<String>,
    pub region: String,
}

impl Default for TencentCloudConfig {
    fn default() -> Self {
        Self {
            secret_id: None,
            secret_key: None,
            region: DEFAULT_REGION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibreConfig {
    pub servers: Vec<String>,
    pub api_key: Option<String>,
}

impl Default for LibreConfig {
    fn default() -> Self {
        Self {
            servers: DEFAULT_SERVERS.iter().map(|s| s.to_string()).collect(),
            api_key: None,
        }
    }
}

/// Batch scheduling knobs
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Jobs issued concurrently per batch
    pub batch_size: usize,
    /// Attempts per key before falling back to the source text
    pub max_retries: usize,
    /// First backoff delay; doubles on every further attempt
    pub base_delay_ms: u64,
    /// Pause between two batches
    pub batch_delay_ms: u64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            batch_size: 3,
            max_retries: 5,
            base_delay_ms: 500,
            batch_delay_ms: 1000,
        }
    }
}

impl PipelineSettings {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub english_path: PathBuf,
    pub target_path: PathBuf,
    pub format: FileFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            english_path: PathBuf::from("./locales/en.js"),
            target_path: PathBuf::from("./locales/ar.js"),
            format: FileFormat::Module,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: Provider,
    pub source_locale: String,
    pub target_locale: String,
    pub google: GoogleConfig,
    pub baidu: BaiduConfig,
    pub tencent_cloud: TencentCloudConfig,
    pub libre: LibreConfig,
    pub pipeline: PipelineSettings,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            source_locale: "en".to_string(),
            target_locale: "ar".to_string(),
            google: GoogleConfig::default(),
            baidu: BaiduConfig::default(),
            tencent_cloud: TencentCloudConfig::default(),
            libre: LibreConfig::default(),
            pipeline: PipelineSettings::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("invalid config: {}", e)))
    }

    /// Read a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Optional file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_with(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Override fields from variables looked up through `lookup`
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("I18N_PROVIDER") {
            self.provider = provider.parse()?;
        }
        if let Some(key) = lookup("GOOGLE_TRANSLATE_API_KEY") {
            self.google.api_key = Some(key);
        }
        if let Some(app_id) = lookup("BAIDU_APP_ID") {
            self.baidu.app_id = Some(app_id);
        }
        if let Some(secret) = lookup("BAIDU_SECRET") {
            self.baidu.secret = Some(secret);
        }
        if let Some(id) = lookup("TENCENT_SECRET_ID") {
            self.tencent_cloud.secret_id = Some(id);
        }
        if let Some(key) = lookup("TENCENT_SECRET_KEY") {
            self.tencent_cloud.secret_key = Some(key);
        }
        if let Some(region) = lookup("TENCENT_REGION") {
            self.tencent_cloud.region = region;
        }
        if let Some(key) = lookup("LIBRE_TRANSLATE_API_KEY") {
            self.libre.api_key = Some(key);
        }
        Ok(())
    }
}
