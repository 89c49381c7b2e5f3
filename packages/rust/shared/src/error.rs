//! Error types for inkpage.
//!
//! Library crates use [`InkpageError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all inkpage operations.
#[derive(Debug, thiserror::Error)]
pub enum InkpageError {
    /// Configuration loading error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Configuration document does not satisfy the config schema.
    #[error("validation error: {message}")]
    Validation {
        message: String,
        /// One entry per violation, prefixed with its instance path.
        violations: Vec<String>,
    },

    /// TOML or JSON parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The dispatch primitive rejected an operation. The source is whatever
    /// the far side reported and is never inspected here.
    #[error("dispatch of {operation} failed: {source}")]
    Dispatch {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An argument could not be encoded as JSON before dispatch.
    #[error("could not encode arguments for {operation}: {source}")]
    Encode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The value returned for an operation did not have the expected shape.
    #[error("could not decode result of {operation}: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, InkpageError>;

impl InkpageError {
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

    /// Create a validation error carrying the individual violations.
    pub fn validation(msg: impl Into<String>, violations: Vec<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            violations,
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
        let err = InkpageError::config("missing index page");
        assert_eq!(err.to_string(), "config error: missing index page");

        let err = InkpageError::validation(
            "2 schema violations",
            vec!["/indexPage: 3 is not of type \"string\"".into()],
        );
        assert!(err.to_string().contains("2 schema violations"));
    }

    #[test]
    fn dispatch_error_keeps_source() {
        let err = InkpageError::Dispatch {
            operation: "index.get",
            source: "page is locked".into(),
        };
        assert_eq!(err.to_string(), "dispatch of index.get failed: page is locked");
        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "page is locked");
    }
}
