//! Error types for LaunchKit.
//!
//! Library crates use [`LaunchKitError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! [`StageError`] is narrower: it describes why a single stage could not
//! produce content. It never crosses a stage boundary; the boundary turns it
//! into a [`Fallback`](crate::outcome::Fallback) outcome instead.

use std::path::PathBuf;

use crate::outcome::StageId;

/// Top-level error type for all LaunchKit operations that can fail.
#[derive(Debug, thiserror::Error)]
pub enum LaunchKitError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad input, invalid shape, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// JSON encoding/decoding of a result document failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing an export bundle failed for a reason other than raw I/O.
    #[error("export error: {0}")]
    Export(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LaunchKitError>;

impl LaunchKitError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
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

/// Why a stage could not produce real content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    /// The brief carries no usable idea text.
    #[error("no usable input for {stage}")]
    NoUsableInput { stage: StageId },

    /// A required upstream output was missing entirely.
    #[error("missing input from {stage}")]
    MissingInput { stage: StageId },

    /// A required upstream stage fell back, so there is nothing to build on.
    #[error("upstream {stage} produced no output")]
    UpstreamFallback { stage: StageId },

    /// Template rendering failed.
    #[error("render failed: {message}")]
    Render { message: String },

    /// The stage task panicked or was aborted.
    #[error("{stage} task did not complete")]
    Panicked { stage: StageId },
}

impl StageError {
    /// Create a render error from any displayable message.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = LaunchKitError::config("workers must be at least 1");
        assert_eq!(err.to_string(), "config error: workers must be at least 1");

        let err = LaunchKitError::validation("idea too long");
        assert!(err.to_string().contains("idea too long"));
    }

    #[test]
    fn stage_error_names_the_stage() {
        let err = StageError::UpstreamFallback {
            stage: StageId::Brand,
        };
        assert_eq!(err.to_string(), "upstream brand produced no output");

        let err = StageError::Panicked {
            stage: StageId::Pricing,
        };
        assert!(err.to_string().contains("pricing"));
    }
}
