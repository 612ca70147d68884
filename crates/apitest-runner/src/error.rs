//! Error types for test documents and transports

use std::path::PathBuf;
use thiserror::Error;

/// Result type for document loading and saving
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors that can occur while reading or writing test documents
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read a file
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON
    #[error("failed to parse JSON in {path}: {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to parse YAML
    #[error("failed to parse YAML in {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Document parsed but does not have the expected shape
    #[error("invalid {kind} in {origin}: {source}")]
    InvalidShape {
        kind: &'static str,
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to serialize a document
    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors reported by a transport when a request cannot be completed
///
/// Status codes are not errors; any response that arrives is a success.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{method} {url} failed: {source}")]
    Request {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0}")]
    Other(String),
}
