use std::path::PathBuf;
use thiserror::Error;

/// Failures reading the registry. Distinct from "token not registered",
/// which is a normal `Ok(None)` lookup result.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// Registry medium could not be read.
    #[error("Registry unavailable ({path}): {reason}")]
    Unavailable { path: PathBuf, reason: String },

    /// Registry was read but is not a valid identity list.
    #[error("Registry malformed ({path}): {reason}")]
    Malformed { path: PathBuf, reason: String },
}
