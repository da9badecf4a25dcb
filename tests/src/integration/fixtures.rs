//! Shared wiring for integration tests.

use std::path::Path;
use std::sync::Arc;

use pl_01_registry::{InMemoryRegistry, JsonFileRegistry, RegistryAccessor};
use pl_02_event_log::{EventLogStore, FileEventLog, InMemoryEventLog};
use pl_03_transition::{FixedTimeSource, TransitionEngine};
use pl_04_ingestion::{IngestConfig, IngestionDependencies, IngestionService};
use pl_05_subscription_hub::{HubConfig, SubscriptionHub};
use pl_06_query::QueryService;
use shared_types::Identity;

pub const DEVICE: &str = "962849";
pub const ALICE: &str = "123456";
pub const BOB: &str = "ABCDEF";

pub fn identities() -> Vec<Identity> {
    vec![
        Identity::new(1u64, "Alice", ALICE),
        Identity::new("badge-2", "Bob", BOB),
    ]
}

pub const REGISTRY_JSON: &str = r#"[
  {"Id": 1, "Name": "Alice", "Value": "123456"},
  {"Id": "badge-2", "Name": "Bob", "Value": "ABCDEF"}
]"#;

/// Everything a test needs to drive and inspect one wired node.
pub struct Node<L> {
    pub ingestion: Arc<IngestionService>,
    pub query: Arc<QueryService>,
    pub hub: Arc<SubscriptionHub>,
    pub log: Arc<L>,
    pub clock: Arc<FixedTimeSource>,
}

fn wire<L: EventLogStore + 'static>(
    registry: Arc<dyn RegistryAccessor>,
    log: Arc<L>,
    hub_config: HubConfig,
) -> Node<L> {
    let clock = Arc::new(FixedTimeSource::new(1_700_000_000_000));
    let hub = Arc::new(SubscriptionHub::new(hub_config));
    let ingestion = Arc::new(IngestionService::new(
        IngestConfig::new(DEVICE),
        IngestionDependencies {
            registry: Arc::clone(&registry),
            log: log.clone(),
            engine: TransitionEngine::new(clock.clone()),
            publisher: hub.clone(),
        },
    ));
    let query = Arc::new(QueryService::new(registry, log.clone()));

    Node {
        ingestion,
        query,
        hub,
        log,
        clock,
    }
}

/// Volatile stores.
pub fn in_memory() -> Node<InMemoryEventLog> {
    wire(
        Arc::new(InMemoryRegistry::new(identities())),
        Arc::new(InMemoryEventLog::new()),
        HubConfig::default(),
    )
}

/// JSON files under `dir`, as the binary would open them.
pub fn on_disk(dir: &Path, hub_config: HubConfig) -> Node<FileEventLog> {
    let registry_path = dir.join("tags.json");
    std::fs::write(&registry_path, REGISTRY_JSON).unwrap();

    wire(
        Arc::new(JsonFileRegistry::new(registry_path)),
        Arc::new(FileEventLog::new(dir.join("entries.json"))),
        hub_config,
    )
}
