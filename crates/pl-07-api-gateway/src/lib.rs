//! # API Gateway (pl-07)
//!
//! The two network surfaces of the ledger.
//!
//! ## Listeners
//!
//! | Listener | Default | Routes |
//! |----------|---------|--------|
//! | Scan ingress (HTTP) | `0.0.0.0:80` | `/health`, `/metrics`; any other path or method is a scan |
//! | Observers (WebSocket) | `0.0.0.0:8080` | `/` upgrade |
//!
//! ## Scan responses
//!
//! | Outcome | Status | Body |
//! |---------|--------|------|
//! | Committed | 200 | empty |
//! | Device claim or token missing/wrong | 401 | `Unauthorized` |
//! | Token not registered | 404 | `RfidTag is not registered` |
//! | Storage failure | 500 | `Internal Server Error` |
//!
//! Blocking storage work runs on tokio's blocking pool so the listeners keep
//! accepting while a scan is being committed.

pub mod domain;
pub mod middleware;
pub mod routes;
pub mod service;
pub mod ws;

pub use domain::config::{
    ConfigError, CorsConfig, DeviceConfig, GatewayConfig, HubSettings, IngressConfig,
    WebSocketConfig,
};
pub use domain::error::{ApiError, GatewayError};
pub use service::{ApiGatewayService, AppState, RunningGateway};
pub use ws::ObserverConnection;
