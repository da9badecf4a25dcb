//! # Shared Ports
//!
//! The seam between ingestion and observer fan-out. Ingestion only knows it
//! must announce committed events; the subscription hub decides who hears them.

use crate::entities::Event;

/// Announces committed events to observers.
///
/// Called while the ingestion lock is held, so implementations must never
/// block or wait on an observer.
pub trait ChangePublisher: Send + Sync {
    /// Queue a `TagModified` notification for every open observer.
    ///
    /// Returns the number of observers it was queued for.
    fn publish_change(&self, event: &Event) -> usize;
}

/// Publisher that drops every notification, for ingestion with no hub attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPublisher;

impl ChangePublisher for NullPublisher {
    fn publish_change(&self, _event: &Event) -> usize {
        0
    }
}
