use std::path::PathBuf;

use sea_orm::DbErr;
use thiserror::Error;

/// Errors surfaced by the store
///
/// Storage errors are passed through untouched; turning them into a
/// user-facing message is the caller's job.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid UID {0:?}: must be 8-14 alphanumeric characters")]
    InvalidUid(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] DbErr),

    #[error("Failed to create data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// True for errors caused by caller input rather than the storage layer
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::InvalidUid(_))
    }
}
