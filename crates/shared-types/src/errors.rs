//! # Error Types
//!
//! Errors shared across subsystems.

use thiserror::Error;

/// A client frame that could not be turned into a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Frame is not a JSON object with a string `Action`.
    #[error("Malformed request: {0}")]
    Malformed(String),

    /// `Action` names nothing the server answers.
    #[error("Action not found")]
    UnknownAction(String),
}
