//! Keep `$t('…')` locale files in step with the source that uses them.
//!
//! Keys referenced in a source file get English text derived from the key itself and a
//! machine translation into the target language. Both are merged into nested locale
//! files without touching entries that already exist.

pub mod codec;
pub mod config;
pub mod error;
pub mod key;
pub mod key_format;
pub mod mt;
pub mod nested;
pub mod paths;
pub mod pipeline;

pub use codec::{FileFormat, TranslationFile};
pub use config::Config;
pub use error::{Error, Result};
pub use key::{TranslationKey, extract_keys};
pub use key_format::format_key;
pub use nested::NestedMap;
pub use paths::resolve_output_path;
pub use pipeline::{
    BatchTranslationPipeline, CancelToken, FallbackWarning, ProgressEvent, RunOutcome, RunSummary,
};
