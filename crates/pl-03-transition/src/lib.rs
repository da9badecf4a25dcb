//! # Transition Engine (pl-03)
//!
//! Decides the direction of the next event for an identity from the event
//! history alone. Nothing here performs I/O; time comes in through the
//! [`TimeSource`] port.
//!
//! ## State Machine (per identity)
//!
//! ```text
//! UNSEEN ──scan──→ IN ──scan──→ OUT ──scan──→ IN ...
//! ```
//!
//! No state is skipped and none is terminal. The state is always
//! reconstructible from the log.
//!
//! ## Crate Structure
//!
//! - `domain/engine` - the transition rule and `TransitionEngine`
//! - `domain/state` - `PresenceState` derivation
//! - `domain/audit` - alternation checker over a whole history
//! - `ports` - `TimeSource` and its system/fixed adapters

pub mod domain;
pub mod ports;

pub use domain::audit::{audit_alternation, AlternationViolation};
pub use domain::engine::{next_event, TransitionEngine};
pub use domain::state::{current_state, PresenceState};
pub use ports::{FixedTimeSource, SystemTimeSource, TimeSource};
