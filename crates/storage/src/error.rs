//! Error types for storage operations.

use std::path::{Path, PathBuf};

use types::DomainId;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Failures reading inputs or writing artifacts.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("CSV error in {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("no reference for domain {domain} at {}", path.display())]
    MissingReference { domain: DomainId, path: PathBuf },

    #[error("invalid results layout: {0}")]
    InvalidLayout(String),
}

impl StorageError {
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self {
        move |source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn json(path: &Path) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &Path) -> impl FnOnce(csv::Error) -> Self {
        move |source| StorageError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}
