//! # Shared Types Crate
//!
//! Domain entities, wire messages and the change-publisher port used by every
//! presence-ledger subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Identity`, `Event` and `Direction` are defined
//!   once here, with the exact field names the registry and log files use.
//! - **Log Is Authoritative**: current presence is never stored; it is derived
//!   from the event history with [`last_event_for`].
//! - **One Wire Envelope**: every frame sent to an observer is a
//!   [`ServerMessage`].

pub mod entities;
pub mod errors;
pub mod ports;
pub mod protocol;

pub use entities::*;
pub use errors::*;
pub use ports::*;
pub use protocol::*;
