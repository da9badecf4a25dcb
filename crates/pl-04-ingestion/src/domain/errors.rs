//! # Ingestion Errors
//!
//! Every error is terminal for its request: nothing is retried, nothing is
//! partially committed and nothing is broadcast.

use pl_01_registry::RegistryError;
use pl_02_event_log::StorageError;
use std::fmt;
use thiserror::Error;

/// Why a scan was refused as unauthorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedReason {
    /// No device claim supplied.
    MissingDevice,
    /// Device claim does not match the configured value.
    UnknownDevice,
    /// Token value absent or blank.
    MissingToken,
}

impl UnauthorizedReason {
    pub fn as_str(self) -> &'static str {
        match self {
            UnauthorizedReason::MissingDevice => "missing_device",
            UnauthorizedReason::UnknownDevice => "unknown_device",
            UnauthorizedReason::MissingToken => "missing_token",
        }
    }
}

impl fmt::Display for UnauthorizedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("Unauthorized ({0})")]
    Unauthorized(UnauthorizedReason),

    #[error("RfidTag is not registered")]
    NotRegistered { token: String },

    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl IngestError {
    /// HTTP status for the scan ingress.
    pub fn status_code(&self) -> u16 {
        match self {
            IngestError::Unauthorized(_) => 401,
            IngestError::NotRegistered { .. } => 404,
            IngestError::StorageFailure(_) => 500,
        }
    }

    /// Metric label for the rejected outcome.
    pub fn outcome_label(&self) -> &'static str {
        match self {
            IngestError::Unauthorized(reason) => reason.as_str(),
            IngestError::NotRegistered { .. } => "not_registered",
            IngestError::StorageFailure(_) => "storage_failure",
        }
    }
}

impl From<StorageError> for IngestError {
    fn from(err: StorageError) -> Self {
        IngestError::StorageFailure(err.to_string())
    }
}

impl From<RegistryError> for IngestError {
    fn from(err: RegistryError) -> Self {
        IngestError::StorageFailure(err.to_string())
    }
}
