use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use shared_types::Event;

use crate::errors::StorageError;
use crate::ports::EventLogStore;

/// Volatile event log for unit tests.
///
/// `set_unavailable(true)` makes every call fail with
/// `StorageError::Unavailable`, which is how the no-broadcast-on-failure
/// path is exercised.
#[derive(Default)]
pub struct InMemoryEventLog {
    events: RwLock<Arc<Vec<Event>>>,
    write_lock: Mutex<()>,
    unavailable: AtomicBool,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing history.
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: RwLock::new(Arc::new(events)),
            ..Self::default()
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable {
                reason: "in-memory log switched off".into(),
            });
        }
        Ok(())
    }
}

impl EventLogStore for InMemoryEventLog {
    fn history(&self) -> Result<Arc<Vec<Event>>, StorageError> {
        self.check()?;
        Ok(Arc::clone(&self.events.read()))
    }

    fn append(&self, event: Event) -> Result<Event, StorageError> {
        let _writer = self.write_lock.lock();
        self.check()?;

        let mut next = Vec::clone(&self.events.read());
        next.push(event.clone());
        *self.events.write() = Arc::new(next);
        Ok(event)
    }
}
