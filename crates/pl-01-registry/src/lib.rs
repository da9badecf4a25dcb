//! # Tag Registry (pl-01)
//!
//! Resolves the token value carried by a scanned credential to the
//! registered [`Identity`](shared_types::Identity) it belongs to.
//!
//! ## Contract
//!
//! | Rule | Description |
//! |------|-------------|
//! | Trimmed match | Token and registered value are both trimmed before comparing |
//! | No caching | Every lookup reflects the registry at call time |
//! | Read-only | The core never writes the registry |
//! | Loud failure | An unreadable registry is an error, never an empty registry |
//!
//! ## Crate Structure
//!
//! - `ports` - `RegistryAccessor` trait consumed by ingestion and queries
//! - `adapters/json_file` - registry backed by a JSON array file, re-read per call
//! - `adapters/memory` - in-process registry for tests and embedding
//! - `errors` - `RegistryError`

pub mod adapters;
pub mod errors;
pub mod ports;

pub use adapters::{InMemoryRegistry, JsonFileRegistry};
pub use errors::RegistryError;
pub use ports::RegistryAccessor;
