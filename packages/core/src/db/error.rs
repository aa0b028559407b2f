//! Store Error Types
//!
//! Errors raised while encoding, decoding, reading or writing a saved
//! document. Graph-level validation failures during import are wrapped
//! unchanged.

use crate::services::GraphError;
use std::path::PathBuf;
use thiserror::Error;

/// Document persistence errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the document file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML encoding or decoding failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The path's extension maps to no known encoding
    #[error("Unsupported document format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// The decoded snapshot does not describe a valid graph
    #[error("Invalid document: {0}")]
    Graph(#[from] GraphError),
}

impl StoreError {
    /// Create an I/O error naming the file involved
    pub fn io(path: PathBuf, source: std::io::Error) -> Self {
        Self::Io { path, source }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(path: PathBuf) -> Self {
        Self::UnsupportedFormat { path }
    }
}
