//! Query execution and request dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use pl_01_registry::RegistryAccessor;
use pl_02_event_log::EventLogStore;
use presence_telemetry::QUERY_REQUESTS;
use shared_types::{
    Action, ClientRequest, Event, IdentityId, Payload, ServerMessage, TagState,
};
use tracing::{debug, warn};

use crate::errors::QueryError;

/// Answers `GetTags` and `GetEntries`.
pub struct QueryService {
    registry: Arc<dyn RegistryAccessor>,
    log: Arc<dyn EventLogStore>,
}

impl QueryService {
    pub fn new(registry: Arc<dyn RegistryAccessor>, log: Arc<dyn EventLogStore>) -> Self {
        Self { registry, log }
    }

    /// Every registered identity with its latest event attached.
    ///
    /// Identities with no events carry no `CurrentDir`.
    pub fn registry_with_state(&self) -> Result<Vec<TagState>, QueryError> {
        let identities = self.registry.identities()?;
        let history = self.log.history()?;

        let mut latest: HashMap<&IdentityId, &Event> = HashMap::new();
        for event in history.iter() {
            latest.insert(&event.identity_id, event);
        }

        Ok(identities
            .into_iter()
            .map(|identity| {
                let current = latest.get(&identity.id).map(|e| (*e).clone());
                TagState { identity, current }
            })
            .collect())
    }

    /// The whole log, oldest first.
    pub fn history(&self) -> Result<Arc<Vec<Event>>, QueryError> {
        Ok(self.log.history()?)
    }

    /// Run one resolved action and wrap the result for the wire.
    pub fn execute(&self, action: Action) -> ServerMessage {
        let result = match action {
            Action::GetTags => self.registry_with_state().map(Payload::Tags),
            Action::GetEntries => self
                .history()
                .map(|history| Payload::Entries(history.as_ref().clone())),
        };

        match result {
            Ok(payload) => {
                QUERY_REQUESTS
                    .with_label_values(&[action.as_str(), "ok"])
                    .inc();
                ServerMessage::ok(action.as_str(), payload)
            }
            Err(e) => {
                QUERY_REQUESTS
                    .with_label_values(&[action.as_str(), "error"])
                    .inc();
                warn!(action = action.as_str(), error = %e, "Query failed");
                ServerMessage::failure(action.as_str(), e.to_string())
            }
        }
    }

    /// Handle one raw text frame from an observer.
    ///
    /// Always produces a response; protocol errors become failure frames.
    pub fn handle_request(&self, text: &str) -> ServerMessage {
        let request = match ClientRequest::parse(text) {
            Ok(request) => request,
            Err(e) => {
                QUERY_REQUESTS
                    .with_label_values(&["malformed", "error"])
                    .inc();
                debug!(error = %e, "Malformed observer frame");
                return ServerMessage::failure("", e.to_string());
            }
        };

        match request.resolve() {
            Ok(action) => self.execute(action),
            Err(e) => {
                QUERY_REQUESTS
                    .with_label_values(&["unknown", "error"])
                    .inc();
                debug!(action = %request.action, "Unknown observer action");
                ServerMessage::failure(request.action.clone(), e.to_string())
            }
        }
    }
}
