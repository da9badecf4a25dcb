//! Scan input and the claim/token checks that run before any lookup.

use subtle::ConstantTimeEq;

use super::errors::{IngestError, UnauthorizedReason};

/// One scan as delivered by the reader transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRequest {
    /// Device identity claim sent by the scanner.
    pub device_claim: Option<String>,
    /// Raw token value read from the credential.
    pub token: Option<String>,
}

impl ScanRequest {
    pub fn new(device_claim: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            device_claim: Some(device_claim.into()),
            token: Some(token.into()),
        }
    }
}

/// Ingestion settings.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// The only device claim accepted.
    pub expected_device_id: String,
}

impl IngestConfig {
    pub fn new(expected_device_id: impl Into<String>) -> Self {
        Self {
            expected_device_id: expected_device_id.into(),
        }
    }

    /// Step 1: the claim must equal the configured value exactly.
    ///
    /// Compared in constant time. An empty configured value accepts nothing.
    pub fn check_claim(&self, claim: Option<&str>) -> Result<(), IngestError> {
        let claim = match claim {
            Some(c) if !c.is_empty() => c,
            _ => return Err(IngestError::Unauthorized(UnauthorizedReason::MissingDevice)),
        };

        let expected = self.expected_device_id.as_bytes();
        let matches: bool = claim.as_bytes().ct_eq(expected).into();
        if expected.is_empty() || !matches {
            return Err(IngestError::Unauthorized(UnauthorizedReason::UnknownDevice));
        }
        Ok(())
    }
}

/// Step 2: the token must be non-empty after trimming. Returns it trimmed.
pub fn require_token(token: Option<&str>) -> Result<&str, IngestError> {
    match token.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t),
        _ => Err(IngestError::Unauthorized(UnauthorizedReason::MissingToken)),
    }
}
