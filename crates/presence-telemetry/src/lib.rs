//! # Presence Telemetry
//!
//! Logging and metrics for every presence-ledger process.
//!
//! ## Components
//!
//! - **Logs**: `tracing` events rendered by `tracing-subscriber`, pretty for
//!   terminals or JSON for log shippers
//! - **Metrics**: Prometheus counters and gauges in a crate-level registry,
//!   exposed as text by the gateway's `/metrics` route
//!
//! ## Usage
//!
//! ```rust,ignore
//! use presence_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env()?)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RUST_LOG` | - | Full `EnvFilter` directive, wins over `PL_LOG_LEVEL` |
//! | `PL_LOG_LEVEL` | `info` | Log level filter |
//! | `PL_JSON_LOGS` | `true` in containers | JSON log lines (`true`/`false`/`1`/`0`) |
//! | `PL_SERVICE_NAME` | `presence-ledger` | Service name logged at startup and shutdown |

mod config;
mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, EVENTS_COMMITTED, FRAMES_DELIVERED, OBSERVERS_CONNECTED,
    OBSERVERS_EVICTED, QUERY_REQUESTS, SCANS_TOTAL,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Install the global subscriber and register all metrics.
///
/// Call once, at the very start of `main`. The returned guard logs on drop
/// so the last line of a clean shutdown is always visible.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    register_metrics()?;
    tracing_setup::init_tracing(&config)?;
    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Keeps telemetry alive for the process lifetime.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Telemetry shut down");
    }
}
