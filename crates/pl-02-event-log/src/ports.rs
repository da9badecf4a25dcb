//! Port for event log access.

use std::sync::Arc;

use shared_types::{last_event_for, Event, IdentityId};

use crate::errors::StorageError;

/// Durable, ordered, append-only event storage.
///
/// `history` hands out an immutable snapshot so readers never observe a
/// half-applied append and never wait on a writer's disk sync.
pub trait EventLogStore: Send + Sync {
    /// The full ordered event sequence, oldest first.
    fn history(&self) -> Result<Arc<Vec<Event>>, StorageError>;

    /// Durably append one event and return it as committed.
    fn append(&self, event: Event) -> Result<Event, StorageError>;

    /// Most recent event for an identity. Derived from `history`.
    fn last_for(&self, identity_id: &IdentityId) -> Result<Option<Event>, StorageError> {
        let history = self.history()?;
        Ok(last_event_for(&history, identity_id).cloned())
    }
}
