//! Centralized error types for notify-i18n.
//!
//! None of these reach callers of [`crate::i18n::LocaleManager`]: the manager
//! absorbs every failure and falls back to untranslated text. They surface
//! from catalog loaders and from parsing a [`crate::i18n::LanguageCode`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the notify-i18n library.
#[derive(Error, Debug)]
pub enum LocaleError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No catalog file exists for the requested language.
    #[error("No translation catalog for '{language}' at {path}")]
    CatalogNotFound { language: String, path: PathBuf },

    /// The catalog file exists but could not be parsed.
    #[error("Invalid translation catalog '{path}': {reason}")]
    InvalidCatalog { path: PathBuf, reason: String },

    /// The string does not start with a two-letter language code.
    #[error("Not a recognizable language: {0:?}")]
    InvalidLanguage(String),

    /// No catalog loading facility is compiled in or configured.
    #[error("Translation support is unavailable")]
    Unavailable,
}

/// Convenience alias for `Result<T, LocaleError>`.
pub type Result<T> = std::result::Result<T, LocaleError>;

impl LocaleError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
