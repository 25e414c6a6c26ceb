//! Static provider selection

use crate::config::Config;
pub use crate::config::Provider;
use crate::error::{Error, Result};
use crate::mt::baidu::BaiduTranslator;
use crate::mt::google_translate::GoogleTranslateProvider;
use crate::mt::libre::LibreTranslator;
use crate::mt::mock::{MockMode, MockTranslator};
use crate::mt::tencent::TencentTranslator;
use crate::mt::tencent_cloud::TencentCloudTranslator;
use crate::mt::translator::MachineTranslator;
use std::sync::Arc;

fn required(value: &Option<String>, name: &str) -> Result<String> {
    value
        .as_ref()
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .ok_or_else(|| Error::Config(format!("missing credential: {}", name)))
}

/// Build the translator selected by `config.provider`.
///
/// Missing credentials for the selected provider are reported as `Error::Config`.
pub fn build_translator(config: &Config) -> Result<Arc<dyn MachineTranslator>> {
    let translator: Arc<dyn MachineTranslator> = match config.provider {
        Provider::Google => match &config.google.api_key {
            Some(key) => Arc::new(GoogleTranslateProvider::new(key.clone())?),
            None => Arc::new(GoogleTranslateProvider::web()?),
        },
        Provider::Baidu => Arc::new(BaiduTranslator::new(
            required(&config.baidu.app_id, "baidu.app_id")?,
            required(&config.baidu.secret, "baidu.secret")?,
        )?),
        Provider::Tencent => Arc::new(TencentTranslator::new()?),
        Provider::TencentCloud => Arc::new(TencentCloudTranslator::new(
            required(&config.tencent_cloud.secret_id, "tencent_cloud.secret_id")?,
            required(&config.tencent_cloud.secret_key, "tencent_cloud.secret_key")?,
            config.tencent_cloud.region.clone(),
        )?),
        Provider::Libre => Arc::new(LibreTranslator::new(
            config.libre.servers.clone(),
            config.libre.api_key.clone(),
        )?),
        Provider::Mock => Arc::new(MockTranslator::new(MockMode::Suffix)),
    };
    Ok(translator)
}
