/// Error types for the Machine Translation module
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    /// Missing or unusable provider configuration (credentials, client setup)
    #[error("Configuration error: {0}")]
    Config(String),
    /// Transport-level failure talking to the provider
    #[error("Network error: {0}")]
    Network(String),
    /// The request did not finish in time
    #[error("Request timed out: {0}")]
    Timeout(String),
    /// The provider answered with a non-2xx status or an explicit error field
    #[error("{provider} error: {message}")]
    Provider { provider: String, message: String },
    /// The response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// The provider "succeeded" but returned empty or untranslated text
    #[error("Invalid translation result: {0}")]
    InvalidResult(String),
    /// Locale code rejected before sending anything
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),
    /// Text longer than the provider accepts in one request
    #[error("Text has {length} characters, the limit is {limit}")]
    TextTooLong { length: usize, limit: usize },
}

impl TranslationError {
    pub fn provider(provider: &str, message: impl Into<String>) -> Self {
        TranslationError::Provider {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            TranslationError::Config(_)
                | TranslationError::InvalidLocale(_)
                | TranslationError::TextTooLong { .. }
        )
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TranslationError::Timeout(err.to_string())
        } else if err.is_decode() {
            TranslationError::InvalidResponse(err.to_string())
        } else {
            TranslationError::Network(err.to_string())
        }
    }
}

/// Result type for MT operations
pub type TranslationResult<T> = Result<T, TranslationError>;
