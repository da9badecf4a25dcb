//! Gateway error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pl_04_ingestion::IngestError;
use std::fmt;
use thiserror::Error;

use super::config::ConfigError;

/// Response bodies the field scanners understand.
pub mod bodies {
    pub const UNAUTHORIZED: &str = "Unauthorized";
    pub const NOT_REGISTERED: &str = "RfidTag is not registered";
    pub const INTERNAL: &str = "Internal Server Error";
}

/// Error returned by the scan ingress as a plain-text HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: &'static str,
}

impl ApiError {
    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: bodies::INTERNAL,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.body)
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Unauthorized(_) => Self {
                status: StatusCode::UNAUTHORIZED,
                body: bodies::UNAUTHORIZED,
            },
            IngestError::NotRegistered { .. } => Self {
                status: StatusCode::NOT_FOUND,
                body: bodies::NOT_REGISTERED,
            },
            IngestError::StorageFailure(_) => Self::internal(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.body).into_response()
    }
}

/// Gateway lifecycle errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(String),
}
