use std::path::PathBuf;

use core_types::InvalidArgument;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        InvalidArgument::new(field, reason).into()
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, LedgerError::InvalidArgument(_))
    }
}
