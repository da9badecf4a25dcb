//! Prometheus metrics for presence-ledger.
//!
//! All metrics follow the naming convention: `pl_<subsystem>_<metric>[_total]`
//!
//! ## Metric Types
//!
//! - **Counter**: monotonically increasing (e.g. `pl_ingest_scans_total`)
//! - **Gauge**: goes up and down (e.g. `pl_hub_observers_connected`)

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // INGESTION METRICS (pl-04)
    // =========================================================================

    /// Scans by outcome: accepted, missing_device, unknown_device,
    /// missing_token, not_registered, storage_failure
    pub static ref SCANS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("pl_ingest_scans_total", "Scans received, by outcome"),
        &["outcome"]
    ).expect("metric creation failed");

    /// Committed events by direction (IN/OUT)
    pub static ref EVENTS_COMMITTED: IntCounterVec = IntCounterVec::new(
        Opts::new("pl_ingest_events_committed_total", "Events durably appended, by direction"),
        &["direction"]
    ).expect("metric creation failed");

    // =========================================================================
    // SUBSCRIPTION HUB METRICS (pl-05)
    // =========================================================================

    pub static ref OBSERVERS_CONNECTED: IntGauge = IntGauge::new(
        "pl_hub_observers_connected",
        "Observers currently subscribed"
    ).expect("metric creation failed");

    pub static ref FRAMES_DELIVERED: IntCounter = IntCounter::new(
        "pl_hub_frames_delivered_total",
        "Frames queued to observers"
    ).expect("metric creation failed");

    /// Observers dropped because their queue was full or closed
    pub static ref OBSERVERS_EVICTED: IntCounter = IntCounter::new(
        "pl_hub_observers_evicted_total",
        "Observers removed during delivery"
    ).expect("metric creation failed");

    // =========================================================================
    // QUERY METRICS (pl-06)
    // =========================================================================

    pub static ref QUERY_REQUESTS: IntCounterVec = IntCounterVec::new(
        Opts::new("pl_query_requests_total", "Observer requests, by action and outcome"),
        &["action", "outcome"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry. Safe to call repeatedly.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(SCANS_TOTAL.clone()),
        Box::new(EVENTS_COMMITTED.clone()),
        Box::new(OBSERVERS_CONNECTED.clone()),
        Box::new(FRAMES_DELIVERED.clone()),
        Box::new(OBSERVERS_EVICTED.clone()),
        Box::new(QUERY_REQUESTS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    register_metrics()?;

    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
