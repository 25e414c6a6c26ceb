/// Machine Translation Module
///
/// Everything that talks to a translation backend lives here. The rest of the crate only
/// sees the [`MachineTranslator`] trait, so providers are interchangeable and tests run
/// against [`MockTranslator`].
///
/// # Providers
///
/// - [`GoogleTranslateProvider`] - Cloud Translation v2 with a key, `gtx` web endpoint without
/// - [`BaiduTranslator`] - Baidu Fanyi, md5-signed form requests
/// - [`TencentTranslator`] - TranSmart web endpoint, no credentials
/// - [`TencentCloudTranslator`] - Tencent Cloud TMT, TC3-HMAC-SHA256 signed
/// - [`LibreTranslator`] - LibreTranslate with server failover
///
/// The concrete provider is chosen once, from configuration, by [`build_translator`].
///
/// # Example
///
/// ```ignore
/// use i18n_autotranslate::config::Config;
/// use i18n_autotranslate::mt::build_translator;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::load(None)?;
///     let translator = build_translator(&config)?;
///     let arabic = translator.translate("Display Name", "en", "ar").await?;
///     println!("{}", arabic);
///     Ok(())
/// }
/// ```
pub mod baidu;
pub mod error;
pub mod google_translate;
pub mod libre;
pub mod mock;
pub mod provider;
pub mod tencent;
pub mod tencent_cloud;
pub mod translator;

pub use baidu::BaiduTranslator;
pub use error::{TranslationError, TranslationResult};
pub use google_translate::GoogleTranslateProvider;
pub use libre::LibreTranslator;
pub use mock::{MockMode, MockTranslator};
pub use provider::{Provider, build_translator};
pub use tencent::TencentTranslator;
pub use tencent_cloud::TencentCloudTranslator;
pub use translator::{MachineTranslator, translate_text, validate_translation};
