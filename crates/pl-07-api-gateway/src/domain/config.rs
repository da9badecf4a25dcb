//! Gateway configuration with validation.

use axum::http::HeaderName;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;

/// Main gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Scan ingress (HTTP) listener
    pub ingress: IngressConfig,
    /// Observer (WebSocket) listener
    pub websocket: WebSocketConfig,
    /// Scanner device identity
    pub device: DeviceConfig,
    /// Per-observer queueing
    pub hub: HubSettings,
    /// CORS for browser clients of the ingress listener
    pub cors: CorsConfig,
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device.expected_device_id.trim().is_empty() {
            return Err(ConfigError::MissingDeviceId);
        }

        // Port 0 asks the OS for an ephemeral port, so two of them never clash.
        if self.ingress.port != 0 && self.http_addr() == self.ws_addr() {
            return Err(ConfigError::DuplicateAddress(self.http_addr()));
        }

        for name in [&self.ingress.device_header, &self.ingress.token_header] {
            if HeaderName::from_bytes(name.as_bytes()).is_err() {
                return Err(ConfigError::InvalidHeader(name.clone()));
            }
        }
        if self
            .ingress
            .device_header
            .eq_ignore_ascii_case(&self.ingress.token_header)
        {
            return Err(ConfigError::InvalidHeader(self.ingress.token_header.clone()));
        }

        if self.hub.queue_depth == 0 {
            return Err(ConfigError::InvalidLimit("queue_depth cannot be 0".into()));
        }
        if self.hub.max_observers == 0 {
            return Err(ConfigError::InvalidLimit("max_observers cannot be 0".into()));
        }
        if self.websocket.max_message_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_message_size cannot be 0".into(),
            ));
        }

        Ok(())
    }

    /// Scan ingress bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ingress.host, self.ingress.port)
    }

    /// WebSocket bind address
    pub fn ws_addr(&self) -> SocketAddr {
        SocketAddr::new(self.websocket.host, self.websocket.port)
    }
}

/// Scan ingress configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngressConfig {
    pub host: IpAddr,
    /// Port (default: 80, what the field scanners are flashed with)
    pub port: u16,
    /// Header carrying the device identity claim
    pub device_header: String,
    /// Header carrying the token value
    pub token_header: String,
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 80,
            device_header: "chipid".to_string(),
            token_header: "rfidtag".to_string(),
        }
    }
}

/// WebSocket server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    pub host: IpAddr,
    /// Port (default: 8080)
    pub port: u16,
    /// Largest accepted client frame in bytes
    pub max_message_size: usize,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            max_message_size: 64 * 1024,
        }
    }
}

/// Scanner identity configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// The only device claim accepted. Must be set.
    pub expected_device_id: String,
}

/// Observer queue limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HubSettings {
    pub queue_depth: usize,
    pub max_observers: usize,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            queue_depth: 256,
            max_observers: 1024,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the ingress listener from a browser.
    /// Empty means no CORS headers are sent. `"*"` allows any origin.
    pub allowed_origins: Vec<String>,
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Expected device id is not configured")]
    MissingDeviceId,

    #[error("Ingress and WebSocket listeners share address {0}")]
    DuplicateAddress(SocketAddr),

    #[error("Invalid header name: {0}")]
    InvalidHeader(String),

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),
}
