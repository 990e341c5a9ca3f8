//! Error types for properties parsing and bundle loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// An error that occurred while parsing a properties document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A syntax error with location information.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
}

/// Errors that occur while loading a bundle from its store.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No candidate in the locale fallback chain exists.
    #[error("no bundle '{basename}' for locale '{locale}'")]
    NotFound { basename: String, locale: String },

    /// File I/O error when reading a bundle file.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Parse error with file location context.
    #[error("{path}:{line}:{column}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
}

impl LoadError {
    /// Whether the bundle simply does not exist, as opposed to being unreadable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. })
    }
}
