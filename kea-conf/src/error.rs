use std::path::PathBuf;

use thiserror::Error;

/// Errors returned while loading a Kea configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {}: {source}", path.display())]
    NotFound {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(
        "malformed JSON in {} at line {line}, column {column}: {message}",
        path.display()
    )]
    Json {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("missing key '{key}' in configuration")]
    MissingKey { key: String },
    #[error("invalid value for '{key}': expected {expected}")]
    InvalidValue { key: String, expected: &'static str },
    #[error("unsupported lease database type '{0}' (expected mysql or postgresql)")]
    UnsupportedBackend(String),
}
