//! # Transition Rule
//!
//! - no prior event for the identity → ENTRY
//! - last event ENTRY → EXIT
//! - last event EXIT → ENTRY
//!
//! The timestamp is the current time, raised to the time of the newest event
//! in the log if the clock has stepped backwards. Append order therefore never
//! disagrees with time order.

use std::sync::Arc;

use shared_types::{Event, Identity, Timestamp};

use super::state::current_state;
use crate::ports::{SystemTimeSource, TimeSource};

/// The transition rule with the clock passed in. Same inputs, same output.
pub fn next_event(identity: &Identity, history: &[Event], now: Timestamp) -> Event {
    let direction = current_state(&identity.id, history).on_scan();
    let floor = history.last().map(|e| e.timestamp).unwrap_or(0);
    Event::new(identity.id.clone(), now.max(floor), direction)
}

/// Applies [`next_event`] with time read from a [`TimeSource`].
#[derive(Clone)]
pub struct TransitionEngine {
    clock: Arc<dyn TimeSource>,
}

impl TransitionEngine {
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        Self { clock }
    }

    /// Decide the next event for `identity` given the full `history`.
    pub fn decide(&self, identity: &Identity, history: &[Event]) -> Event {
        next_event(identity, history, self.clock.now_millis())
    }
}

impl Default for TransitionEngine {
    fn default() -> Self {
        Self::new(Arc::new(SystemTimeSource))
    }
}
