//! Error types for configuration loading.
//!
//! The dialog and controller layers never fail: missing elements, empty text
//! and unknown commands degrade to no-ops. Errors only surface where input
//! comes from outside the process.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or validating an [`AnnotatorConfig`].
///
/// [`AnnotatorConfig`]: crate::config::AnnotatorConfig
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error while reading a configuration file
    #[error("IO error reading {path:?}: {source}")]
    Io {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Version mismatch between expected and found
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Version this build understands
        expected: u32,
        /// Version declared by the file
        found: u32,
    },

    /// A field holds a value outside its accepted range
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Name of the offending field
        field: String,
        /// Description of the problem
        message: String,
    },
}

impl ConfigError {
    /// Create an I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
