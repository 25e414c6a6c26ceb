use crate::mt::error::TranslationError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced to the caller of a run.
///
/// Per-key translation failures and unreadable locale files never show up here;
/// they are recovered inside the pipeline and the codec.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Translation(#[from] TranslationError),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
