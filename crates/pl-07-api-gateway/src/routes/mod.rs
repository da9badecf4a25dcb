//! HTTP routes on the ingress listener.

pub mod ops;
pub mod scan;

pub use ops::{health_check, metrics};
pub use scan::handle_scan;
