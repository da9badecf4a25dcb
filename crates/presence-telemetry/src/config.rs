//! Telemetry configuration from environment variables.

use std::env;

use crate::TelemetryError;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name, reported when logging starts and stops
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) used when
    /// `RUST_LOG` is not set
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "presence-ledger".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// JSON logs default to on when running under Kubernetes or Docker.
    pub fn from_env() -> Result<Self, TelemetryError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, TelemetryError> {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        let json_logs = match lookup("PL_JSON_LOGS") {
            None => is_container,
            Some(raw) => parse_flag(&raw).ok_or(TelemetryError::InvalidValue {
                key: "PL_JSON_LOGS",
                value: raw,
            })?,
        };

        Ok(Self {
            service_name: lookup("PL_SERVICE_NAME")
                .unwrap_or_else(|| "presence-ledger".to_string()),

            log_level: lookup("PL_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),

            json_logs,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
