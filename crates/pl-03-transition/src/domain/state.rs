//! Derived presence state.

use shared_types::{last_event_for, Direction, Event, IdentityId};

/// Where an identity currently is, as far as the log knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceState {
    /// No event recorded yet.
    Unseen,
    In,
    Out,
}

impl PresenceState {
    pub fn from_last(last: Option<&Event>) -> Self {
        match last.map(|e| e.direction) {
            None => PresenceState::Unseen,
            Some(Direction::Entry) => PresenceState::In,
            Some(Direction::Exit) => PresenceState::Out,
        }
    }

    /// Direction the next scan records.
    pub fn on_scan(self) -> Direction {
        match self {
            PresenceState::Unseen | PresenceState::Out => Direction::Entry,
            PresenceState::In => Direction::Exit,
        }
    }

    /// State after the next scan.
    pub fn after_scan(self) -> Self {
        match self.on_scan() {
            Direction::Entry => PresenceState::In,
            Direction::Exit => PresenceState::Out,
        }
    }
}

/// Current state of `identity_id` derived from `history`.
pub fn current_state(identity_id: &IdentityId, history: &[Event]) -> PresenceState {
    PresenceState::from_last(last_event_for(history, identity_id))
}
