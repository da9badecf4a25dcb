//! Scan ingress.
//!
//! Scanners send the device claim and the token value as request headers.
//! Success is a bare `200` with an empty body.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use pl_04_ingestion::ScanRequest;
use tracing::error;

use crate::domain::error::ApiError;
use crate::service::AppState;

/// Accepts any method; older scanner firmware sends GET, newer sends POST.
pub async fn handle_scan(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let request = ScanRequest {
        device_claim: header_value(&headers, &state.device_header),
        token: header_value(&headers, &state.token_header),
    };

    let ingestion = Arc::clone(&state.ingestion);
    let outcome = tokio::task::spawn_blocking(move || ingestion.ingest(&request))
        .await
        .map_err(|e| {
            error!(error = %e, "Ingestion task failed");
            ApiError::internal()
        })?;

    outcome.map(|_| StatusCode::OK).map_err(ApiError::from)
}

/// Non-UTF-8 header values count as absent.
fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
