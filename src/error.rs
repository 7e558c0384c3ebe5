//! Error handling for notation import operations.
//!
//! Decoding itself is total and never produces these errors. They cover the
//! surrounding concerns: loading vocabulary tables, reading exported rows,
//! writing tag tables and running batches.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Vocabulary file could not be parsed: {path} - {source}")]
    VocabularyFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid vocabulary (version {version}): {reason}")]
    InvalidVocabulary { version: u32, reason: String },

    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("None of the notation columns {expected:?} were found in {path}")]
    MissingColumns { path: PathBuf, expected: Vec<String> },

    #[error("Batch decoding failed: {reason}")]
    BatchFailed { reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl NotationError {
    /// Create an invalid vocabulary error
    pub fn invalid_vocabulary(version: u32, reason: impl Into<String>) -> Self {
        Self::InvalidVocabulary {
            version,
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NotationError>;
