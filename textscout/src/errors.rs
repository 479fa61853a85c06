use std::path::PathBuf;
use thiserror::Error;

use crate::results::ScanSummary;

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors that can occur during scan operations.
///
/// `RootNotFound`, `InvalidRequest` and `Cancelled` stop the whole scan.
/// `NoFilesFound` still carries a zero-count summary. `FileAccess` is only
/// produced for a single file and is absorbed by the scanner.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Search location does not exist or is not a directory: {0}")]
    RootNotFound(PathBuf),
    #[error("No files found with extensions: {extensions}")]
    NoFilesFound {
        extensions: String,
        summary: Box<ScanSummary>,
    },
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Error reading {path}: {source}")]
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Scan cancelled after {files_processed} files")]
    Cancelled { files_processed: u64 },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ScanError {
    pub fn root_not_found(path: impl Into<PathBuf>) -> Self {
        Self::RootNotFound(path.into())
    }

    pub fn no_files_found(summary: ScanSummary) -> Self {
        Self::NoFilesFound {
            extensions: summary.extensions.join(", "),
            summary: Box::new(summary),
        }
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether this error aborted the scan before a summary could be built
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::NoFilesFound { .. } | Self::FileAccess { .. })
    }
}

impl From<config::ConfigError> for ScanError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
