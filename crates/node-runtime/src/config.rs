//! # Node Configuration
//!
//! Defaults overridden by `PL_*` environment variables, then validated.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PL_DATA_DIR` | `./data` |
//! | `PL_REGISTRY_FILE` | `<data>/tags.json` |
//! | `PL_EVENT_LOG_FILE` | `<data>/entries.json` |
//! | `PL_DEVICE_ID` | required |
//! | `PL_HTTP_HOST` / `PL_HTTP_PORT` | `0.0.0.0` / `80` |
//! | `PL_WS_HOST` / `PL_WS_PORT` | `0.0.0.0` / `8080` |
//! | `PL_OBSERVER_BUFFER` | `256` |
//! | `PL_MAX_OBSERVERS` | `1024` |
//! | `PL_CORS_ORIGINS` | none (comma separated) |
//!
//! Logging variables are read by [`TelemetryConfig::from_lookup`].

use std::path::PathBuf;
use std::str::FromStr;

use pl_07_api_gateway::GatewayConfig;
use presence_telemetry::TelemetryConfig;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// Data directory and file locations.
    pub storage: StorageConfig,
    /// Listeners, device claim and observer limits.
    pub gateway: GatewayConfig,
    /// Logging.
    pub telemetry: TelemetryConfig,
}

impl NodeConfig {
    /// Validate before anything is opened or bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gateway.validate()?;
        if self.storage.registry_file == self.storage.event_log_file {
            return Err(ConfigError::SharedFile(self.storage.event_log_file.clone()));
        }
        Ok(())
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Holds the lock file and, by default, both data files.
    pub data_dir: PathBuf,
    /// JSON array of `{Id, Name, Value}`.
    pub registry_file: PathBuf,
    /// JSON array of `{TagId, Time, Dir}`.
    pub event_log_file: PathBuf,
}

impl StorageConfig {
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            registry_file: data_dir.join("tags.json"),
            event_log_file: data_dir.join("entries.json"),
            data_dir,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::in_dir("./data")
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Registry and event log both point at {0}")]
    SharedFile(PathBuf),

    #[error(transparent)]
    Gateway(#[from] pl_07_api_gateway::ConfigError),

    #[error(transparent)]
    Telemetry(#[from] presence_telemetry::TelemetryError),
}

/// Load configuration from the process environment.
pub fn load_config() -> Result<NodeConfig, ConfigError> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Load configuration from an arbitrary variable source.
///
/// Unset variables keep their defaults; set but unparsable ones are errors.
pub fn load_config_from(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<NodeConfig, ConfigError> {
    let mut config = NodeConfig {
        telemetry: TelemetryConfig::from_lookup(&lookup)?,
        ..NodeConfig::default()
    };

    if let Some(dir) = lookup("PL_DATA_DIR") {
        config.storage = StorageConfig::in_dir(dir);
    }
    if let Some(path) = lookup("PL_REGISTRY_FILE") {
        config.storage.registry_file = PathBuf::from(path);
    }
    if let Some(path) = lookup("PL_EVENT_LOG_FILE") {
        config.storage.event_log_file = PathBuf::from(path);
    }

    let gateway = &mut config.gateway;
    if let Some(device) = lookup("PL_DEVICE_ID") {
        gateway.device.expected_device_id = device.trim().to_string();
    }
    if let Some(host) = parse(&lookup, "PL_HTTP_HOST")? {
        gateway.ingress.host = host;
    }
    if let Some(port) = parse(&lookup, "PL_HTTP_PORT")? {
        gateway.ingress.port = port;
    }
    if let Some(host) = parse(&lookup, "PL_WS_HOST")? {
        gateway.websocket.host = host;
    }
    if let Some(port) = parse(&lookup, "PL_WS_PORT")? {
        gateway.websocket.port = port;
    }
    if let Some(depth) = parse(&lookup, "PL_OBSERVER_BUFFER")? {
        gateway.hub.queue_depth = depth;
    }
    if let Some(limit) = parse(&lookup, "PL_MAX_OBSERVERS")? {
        gateway.hub.max_observers = limit;
    }
    if let Some(origins) = lookup("PL_CORS_ORIGINS") {
        gateway.cors.allowed_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
    }

    Ok(config)
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}
