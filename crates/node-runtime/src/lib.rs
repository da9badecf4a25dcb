//! # Node Runtime Library
//!
//! Configuration loading and wiring for the `presence-ledger` binary,
//! exposed as a library for tests.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from `PL_*` variables
//! 2. Initialize telemetry, then validate the configuration
//! 3. Lock the data directory and open the stores
//! 4. Audit the existing event log
//! 5. Start the scan ingress and observer listeners

pub mod config;
pub mod runtime;

pub use config::{load_config, load_config_from, ConfigError, NodeConfig, StorageConfig};
pub use runtime::NodeRuntime;
