//! Observer WebSocket channel.

pub mod handler;

pub use handler::{ws_upgrade, ObserverConnection};
