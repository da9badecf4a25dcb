//! # Ingestion Service
//!
//! Owns the pipeline lock. Everything that reads the log in order to write it
//! goes through [`IngestionService::ingest`].

use std::sync::Arc;

use parking_lot::Mutex;
use pl_01_registry::RegistryAccessor;
use pl_02_event_log::EventLogStore;
use pl_03_transition::TransitionEngine;
use presence_telemetry::{EVENTS_COMMITTED, SCANS_TOTAL};
use shared_types::{ChangePublisher, Event};
use tracing::{error, info, warn};

use crate::domain::errors::IngestError;
use crate::domain::request::{require_token, IngestConfig, ScanRequest};

/// Collaborators the service is wired with.
pub struct IngestionDependencies {
    pub registry: Arc<dyn RegistryAccessor>,
    pub log: Arc<dyn EventLogStore>,
    pub engine: TransitionEngine,
    pub publisher: Arc<dyn ChangePublisher>,
}

/// Validates scans and commits them one at a time.
pub struct IngestionService {
    config: IngestConfig,
    registry: Arc<dyn RegistryAccessor>,
    log: Arc<dyn EventLogStore>,
    engine: TransitionEngine,
    publisher: Arc<dyn ChangePublisher>,
    /// Serializes read-history → decide → append → publish.
    pipeline: Mutex<()>,
}

impl IngestionService {
    pub fn new(config: IngestConfig, deps: IngestionDependencies) -> Self {
        Self {
            config,
            registry: deps.registry,
            log: deps.log,
            engine: deps.engine,
            publisher: deps.publisher,
            pipeline: Mutex::new(()),
        }
    }

    /// Process one scan.
    ///
    /// Returns the committed event. On any error nothing was appended and
    /// nothing was published.
    pub fn ingest(&self, request: &ScanRequest) -> Result<Event, IngestError> {
        match self.try_ingest(request) {
            Ok(event) => {
                SCANS_TOTAL.with_label_values(&["accepted"]).inc();
                Ok(event)
            }
            Err(err) => {
                SCANS_TOTAL.with_label_values(&[err.outcome_label()]).inc();
                match &err {
                    IngestError::StorageFailure(reason) => {
                        error!(reason = %reason, "Scan failed on storage")
                    }
                    other => warn!(error = %other, "Scan rejected"),
                }
                Err(err)
            }
        }
    }

    fn try_ingest(&self, request: &ScanRequest) -> Result<Event, IngestError> {
        self.config.check_claim(request.device_claim.as_deref())?;
        let token = require_token(request.token.as_deref())?;

        let identity = self
            .registry
            .lookup(token)?
            .ok_or_else(|| IngestError::NotRegistered {
                token: token.to_string(),
            })?;

        let _pipeline = self.pipeline.lock();

        let history = self.log.history()?;
        let next = self.engine.decide(&identity, &history);
        let committed = self.log.append(next)?;

        let observers = self.publisher.publish_change(&committed);
        EVENTS_COMMITTED
            .with_label_values(&[committed.direction.as_str()])
            .inc();

        info!(
            identity = %identity.id,
            name = %identity.display_name,
            direction = %committed.direction,
            time = committed.timestamp,
            observers,
            "{} goes {}",
            identity.display_name,
            committed.direction
        );
        Ok(committed)
    }
}
