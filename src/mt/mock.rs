//! Mock Machine Translator for testing
//!
//! This module provides a deterministic, API-free translator for testing
//! the batch pipeline without requiring credentials or network access.
//!
//! # Example
//!
//! ```ignore
//! use i18n_autotranslate::mt::{MachineTranslator, MockTranslator, MockMode};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(MockMode::Suffix);
//!     let result = mock.translate("hello", "en", "ar").await.unwrap();
//!     assert_eq!(result, "hello_ar");
//! }
//! ```

use crate::mt::error::{TranslationError, TranslationResult};
use crate::mt::translator::MachineTranslator;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append locale suffix: "hello" → "hello_ar"
    Suffix,

    /// Fail the first N calls with a network error, then behave like `Suffix`
    FailFirst(usize),

    /// Simulate API errors on every call
    Error(String),

    /// Return this exact error on every call
    Fail(TranslationError),

    /// Return an empty string (a provider quirk signalling failure)
    Empty,

    /// No-op: return input unchanged
    NoOp,
}

/// Mock translator that simulates various translation scenarios
///
/// Clones share the call counter, so a test can hand a clone to the pipeline
/// and still inspect how many requests were made.
#[derive(Debug, Clone)]
pub struct MockTranslator {
    mode: MockMode,
    calls: Arc<AtomicUsize>,
}

impl MockTranslator {
    /// Create a new MockTranslator with the given mode
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `translate` calls made so far, across all clones
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Apply translation logic based on the mode; `call_index` is zero-based
    fn apply_translation(
        &self,
        text: &str,
        _source: &str,
        target: &str,
        call_index: usize,
    ) -> TranslationResult<String> {
        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::FailFirst(failures) => {
                if call_index < *failures {
                    Err(TranslationError::Network(format!(
                        "simulated failure {} of {}",
                        call_index + 1,
                        failures
                    )))
                } else {
                    Ok(format!("{}_{}", text, target))
                }
            }
            MockMode::Error(msg) => Err(TranslationError::provider("Mock", msg.clone())),
            MockMode::Fail(error) => Err(error.clone()),
            MockMode::Empty => Ok(String::new()),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> TranslationResult<String> {
        let call_index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.apply_translation(text, source_locale, target_locale, call_index)
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}
