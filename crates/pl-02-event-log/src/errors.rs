//! # Storage Errors

use std::path::PathBuf;
use thiserror::Error;

/// Event log failures. Every variant surfaces to callers as a storage
/// failure; none of them is ever reported as an empty log.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Reading, writing or syncing the medium failed.
    #[error("Event log I/O error ({path}): {reason}")]
    Io { path: PathBuf, reason: String },

    /// The medium was readable but does not hold a valid event list.
    #[error("Event log corrupt ({path}): {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// Store is administratively unavailable.
    #[error("Event log unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StorageError {
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}
