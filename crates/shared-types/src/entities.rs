//! # Domain Entities
//!
//! Registered identities and the presence events recorded for them.
//!
//! Field names on the wire match the registry (`tags.json`) and event log
//! (`entries.json`) files: `{Id, Name, Value}` and `{TagId, Time, Dir}`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

// =============================================================================
// IDENTITY
// =============================================================================

/// Opaque, stable identifier of a registered identity.
///
/// Registries in the field use both numeric and string ids, so both are kept
/// exactly as they were read and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdentityId {
    Numeric(u64),
    Text(String),
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityId::Numeric(n) => write!(f, "{}", n),
            IdentityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for IdentityId {
    fn from(value: u64) -> Self {
        IdentityId::Numeric(value)
    }
}

impl From<&str> for IdentityId {
    fn from(value: &str) -> Self {
        IdentityId::Text(value.to_string())
    }
}

/// A registered tag: the record a scanned token value resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "Id")]
    pub id: IdentityId,
    #[serde(rename = "Name")]
    pub display_name: String,
    /// Token value carried by the physical credential (e.g. RFID UID).
    #[serde(rename = "Value")]
    pub token_value: String,
}

impl Identity {
    pub fn new(
        id: impl Into<IdentityId>,
        display_name: impl Into<String>,
        token_value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            token_value: token_value.into(),
        }
    }

    /// Whitespace-insensitive token comparison (both sides trimmed).
    pub fn matches_token(&self, token: &str) -> bool {
        self.token_value.trim() == token.trim()
    }
}

// =============================================================================
// DIRECTION
// =============================================================================

/// Direction of a presence event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "IN")]
    Entry,
    #[serde(rename = "OUT")]
    Exit,
}

impl Direction {
    /// The direction that must follow this one for the same identity.
    pub fn next(self) -> Self {
        match self {
            Direction::Entry => Direction::Exit,
            Direction::Exit => Direction::Entry,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Entry => "IN",
            Direction::Exit => "OUT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// EVENT
// =============================================================================

/// One durable, timestamped direction record. Never mutated once persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "TagId")]
    pub identity_id: IdentityId,
    #[serde(rename = "Time")]
    pub timestamp: Timestamp,
    #[serde(rename = "Dir")]
    pub direction: Direction,
}

impl Event {
    pub fn new(identity_id: IdentityId, timestamp: Timestamp, direction: Direction) -> Self {
        Self {
            identity_id,
            timestamp,
            direction,
        }
    }
}

/// Most recent event recorded for `identity_id`, scanning from the end.
pub fn last_event_for<'a>(history: &'a [Event], identity_id: &IdentityId) -> Option<&'a Event> {
    history
        .iter()
        .rev()
        .find(|event| &event.identity_id == identity_id)
}
