//! Error types for holocron.
//!
//! Library crates use [`HolocronError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all holocron operations.
#[derive(Debug, thiserror::Error)]
pub enum HolocronError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error talking to the catalog API or the wiki.
    #[error("network error: {0}")]
    Network(String),

    /// Response body could not be decoded.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Document store error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (unknown kind, malformed URL, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Document serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, HolocronError>;

impl HolocronError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = HolocronError::config("unknown kind 'droids'");
        assert_eq!(err.to_string(), "config error: unknown kind 'droids'");

        let err = HolocronError::Network("https://swapi.info/api/films: HTTP 503".into());
        assert!(err.to_string().starts_with("network error:"));
        assert!(err.to_string().contains("HTTP 503"));
    }

    #[test]
    fn serde_errors_convert() {
        let bad = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: HolocronError = bad.into();
        assert!(matches!(err, HolocronError::Serialization(_)));
    }
}
