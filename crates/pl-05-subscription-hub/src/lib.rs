//! # Subscription Hub (pl-05)
//!
//! Tracks connected observers and fans messages out to them.
//!
//! ## Delivery Rules
//!
//! - Each observer owns one bounded queue drained by one writer, so frames
//!   reach it in the order they were queued.
//! - `broadcast` snapshots membership first, then delivers with `try_send`.
//!   It never waits on an observer.
//! - A closed queue is pruned. A full queue means the observer fell behind;
//!   it is evicted so the client reconnects and re-queries instead of
//!   silently missing events.
//! - A failure for one observer never stops delivery to the others.

pub mod errors;
pub mod hub;

pub use errors::HubError;
pub use hub::{Frame, HubConfig, ObserverId, Subscription, SubscriptionHub};
