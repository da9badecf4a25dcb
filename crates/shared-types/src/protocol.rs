//! # Observer Wire Protocol
//!
//! JSON frames exchanged over the subscription channel.
//!
//! ```text
//! client → server   {"Action": "GetTags" | "GetEntries"}
//! server → client   {"Success": bool, "Context": {"Action": ...}, "Payload"?: ..., "Error"?: "..."}
//! ```
//!
//! Every committed scan is pushed unsolicited as a `TagModified` frame whose
//! payload is the new [`Event`].

use crate::entities::{Event, Identity};
use crate::errors::ProtocolError;
use serde::{Deserialize, Serialize};

/// Actions a client may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    GetTags,
    GetEntries,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::GetTags => "GetTags",
            Action::GetEntries => "GetEntries",
        }
    }
}

/// Action name of the unsolicited change notification.
pub const TAG_MODIFIED: &str = "TagModified";

/// Raw client frame. `Action` is kept as text so unknown names can be echoed
/// back in the failure's context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRequest {
    #[serde(rename = "Action")]
    pub action: String,
}

impl ClientRequest {
    /// Parse a text frame into a request.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }

    /// Resolve the action name, case-sensitive as on the wire.
    pub fn resolve(&self) -> Result<Action, ProtocolError> {
        match self.action.as_str() {
            "GetTags" => Ok(Action::GetTags),
            "GetEntries" => Ok(Action::GetEntries),
            other => Err(ProtocolError::UnknownAction(other.to_string())),
        }
    }
}

/// An identity together with its latest event, if it has one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagState {
    #[serde(flatten)]
    pub identity: Identity,
    #[serde(
        rename = "CurrentDir",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub current: Option<Event>,
}

/// Response or push payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Tags(Vec<TagState>),
    Entries(Vec<Event>),
    Event(Event),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContext {
    #[serde(rename = "Action")]
    pub action: String,
}

/// Envelope of every frame the server sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerMessage {
    #[serde(rename = "Success")]
    pub success: bool,
    #[serde(rename = "Context")]
    pub context: MessageContext,
    #[serde(rename = "Payload", default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServerMessage {
    pub fn ok(action: impl Into<String>, payload: Payload) -> Self {
        Self {
            success: true,
            context: MessageContext {
                action: action.into(),
            },
            payload: Some(payload),
            error: None,
        }
    }

    pub fn failure(action: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            context: MessageContext {
                action: action.into(),
            },
            payload: None,
            error: Some(error.into()),
        }
    }

    /// Push frame announcing a freshly committed event.
    pub fn tag_modified(event: Event) -> Self {
        Self::ok(TAG_MODIFIED, Payload::Event(event))
    }

    pub fn action(&self) -> &str {
        &self.context.action
    }

    /// Serialize to the text frame sent on the socket.
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
