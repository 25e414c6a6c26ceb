//! Machine Translation trait and utilities
//!
//! This module defines the `MachineTranslator` trait for provider abstraction,
//! enabling support for different MT backends (Google, Baidu, Tencent, LibreTranslate,
//! mock) without coupling the pipeline to any specific implementation.
//!
//! # Example
//!
//! ```ignore
//! use i18n_autotranslate::mt::{MachineTranslator, TencentTranslator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = TencentTranslator::new()?;
//!     let result = provider.translate("Display Name", "en", "ar").await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

use crate::mt::error::{TranslationError, TranslationResult};
use async_trait::async_trait;

/// Default source language for the translate commands
pub const DEFAULT_SOURCE_LOCALE: &str = "en";
/// Default target language for the translate commands
pub const DEFAULT_TARGET_LOCALE: &str = "ar";
/// Pseudo-locale asking the provider to detect the source language
pub const AUTO_LOCALE: &str = "auto";

/// Generic trait for machine translation providers
///
/// Implementations of this trait handle the actual translation work,
/// whether through an HTTP API or deterministic logic (Mock).
///
/// All methods are async to support I/O-bound operations like network requests.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single text string from source to target locale
    ///
    /// # Arguments
    ///
    /// * `text` - The text to translate
    /// * `source_locale` - Source language code (e.g., "en", or "auto")
    /// * `target_locale` - Target language code (e.g., "ar")
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The translated text
    /// * `Err(TranslationError)` - On provider error, non-2xx response or malformed body
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> TranslationResult<String>;

    /// Get the name of this translation provider
    ///
    /// Used for logging to identify which provider handled a translation.
    fn provider_name(&self) -> &str;
}

/// Reject results that signal a silent provider failure.
///
/// Several providers answer with HTTP 200 and either an empty string or the
/// untouched input when they could not translate. Both count as failures.
pub fn validate_translation(source: &str, translated: &str) -> TranslationResult<String> {
    if translated.trim().is_empty() {
        return Err(TranslationError::InvalidResult(
            "provider returned empty text".to_string(),
        ));
    }
    if translated == source {
        return Err(TranslationError::InvalidResult(format!(
            "provider returned the input unchanged: {}",
            source
        )));
    }
    Ok(translated.to_string())
}

/// One-off translation of user supplied text.
///
/// Rejects blank input before any request is made and treats an empty or unchanged
/// result as a failure.
pub async fn translate_text(
    translator: &dyn MachineTranslator,
    text: &str,
    source_locale: &str,
    target_locale: &str,
) -> TranslationResult<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TranslationError::InvalidResult(
            "nothing to translate".to_string(),
        ));
    }
    validate_locale(source_locale)?;
    validate_locale(target_locale)?;

    let translated = translator
        .translate(text, source_locale, target_locale)
        .await?;
    validate_translation(text, &translated)
}

/// Normalize a locale code by stripping region information
///
/// - `en-US` → `en`
/// - `zh-Hans` → `zh`
/// - `ar` → `ar` (unchanged)
pub fn normalize_locale(locale: &str) -> String {
    locale.split('-').next().unwrap_or(locale).to_lowercase()
}

/// Validate that a locale code is in acceptable format
///
/// Accepts alphanumerics, hyphens and underscores, plus the `auto` pseudo-locale.
pub fn validate_locale(locale: &str) -> TranslationResult<()> {
    if locale.is_empty() {
        return Err(TranslationError::InvalidLocale(
            "Locale code is empty".to_string(),
        ));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(TranslationError::InvalidLocale(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mt::mock::{MockMode, MockTranslator};

    #[test]
    fn test_normalize_locale_with_region() {
        assert_eq!(normalize_locale("en-US"), "en");
        assert_eq!(normalize_locale("ar-SA"), "ar");
        assert_eq!(normalize_locale("zh-Hans"), "zh");
    }

    #[test]
    fn test_normalize_locale_case_insensitive() {
        assert_eq!(normalize_locale("EN"), "en");
        assert_eq!(normalize_locale("AR-EG"), "ar");
    }

    #[test]
    fn test_validate_locale_valid_codes() {
        assert!(validate_locale("en").is_ok());
        assert!(validate_locale("ar").is_ok());
        assert!(validate_locale(AUTO_LOCALE).is_ok());
        assert!(validate_locale("de_DE").is_ok());
    }

    #[test]
    fn test_validate_locale_invalid_codes() {
        assert!(validate_locale("").is_err());
        assert!(validate_locale("en@invalid").is_err());
        match validate_locale("ar#x") {
            Err(TranslationError::InvalidLocale(msg)) => {
                assert!(msg.contains("Invalid characters"));
            }
            _ => panic!("Expected InvalidLocale error"),
        }
    }

    #[test]
    fn test_validate_translation_rejects_empty() {
        assert!(matches!(
            validate_translation("Save", "   "),
            Err(TranslationError::InvalidResult(_))
        ));
    }

    #[test]
    fn test_validate_translation_rejects_echo() {
        assert!(matches!(
            validate_translation("Save", "Save"),
            Err(TranslationError::InvalidResult(_))
        ));
    }

    #[tokio::test]
    async fn test_translate_text_trims_input() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let result = translate_text(&mock, "  Save  ", DEFAULT_SOURCE_LOCALE, DEFAULT_TARGET_LOCALE)
            .await
            .unwrap();
        assert_eq!(result, "Save_ar");
    }

    #[tokio::test]
    async fn test_translate_text_rejects_blank_input() {
        let mock = MockTranslator::new(MockMode::Suffix);
        assert!(translate_text(&mock, " \n", "en", "ar").await.is_err());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_translate_text_rejects_unchanged_result() {
        let mock = MockTranslator::new(MockMode::NoOp);
        assert!(matches!(
            translate_text(&mock, "hello", AUTO_LOCALE, "en").await,
            Err(TranslationError::InvalidResult(_))
        ));
    }

    #[tokio::test]
    async fn test_translate_text_rejects_bad_locale() {
        let mock = MockTranslator::new(MockMode::Suffix);
        assert!(matches!(
            translate_text(&mock, "hello", "en", "a r").await,
            Err(TranslationError::InvalidLocale(_))
        ));
    }

    #[test]
    fn test_validate_translation_accepts_real_text() {
        assert_eq!(validate_translation("Save", "حفظ").unwrap(), "حفظ");
    }
}
