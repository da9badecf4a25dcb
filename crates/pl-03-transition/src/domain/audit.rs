//! # Alternation Audit
//!
//! Walks a complete history and reports every event that breaks strict
//! IN/OUT alternation or goes back in time. Logs written only through the
//! transition engine always audit clean; anything else was edited by hand or
//! by another tool.

use std::collections::HashMap;

use shared_types::{Direction, Event, IdentityId, Timestamp};
use thiserror::Error;

/// One event that does not fit the per-identity state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlternationViolation {
    #[error("event #{index} for {identity_id} is {found}, expected {expected}")]
    OutOfSequence {
        index: usize,
        identity_id: IdentityId,
        found: Direction,
        expected: Direction,
    },

    #[error("event #{index} at {found} is older than the previous event at {previous}")]
    TimeRegression {
        index: usize,
        previous: Timestamp,
        found: Timestamp,
    },
}

/// Every alternation or ordering violation in `history`, in log order.
pub fn audit_alternation(history: &[Event]) -> Vec<AlternationViolation> {
    let mut last_direction: HashMap<&IdentityId, Direction> = HashMap::new();
    let mut violations = Vec::new();
    let mut previous_time: Option<Timestamp> = None;

    for (index, event) in history.iter().enumerate() {
        if let Some(previous) = previous_time {
            if event.timestamp < previous {
                violations.push(AlternationViolation::TimeRegression {
                    index,
                    previous,
                    found: event.timestamp,
                });
            }
        }
        previous_time = Some(event.timestamp);

        let expected = last_direction
            .get(&event.identity_id)
            .map(|d| d.next())
            .unwrap_or(Direction::Entry);
        if event.direction != expected {
            violations.push(AlternationViolation::OutOfSequence {
                index,
                identity_id: event.identity_id.clone(),
                found: event.direction,
                expected,
            });
        }
        last_direction.insert(&event.identity_id, event.direction);
    }

    violations
}
