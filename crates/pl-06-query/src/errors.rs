use pl_01_registry::RegistryError;
use pl_02_event_log::StorageError;
use thiserror::Error;

/// Query failures. Reported to the observer as `Success: false`; the
/// channel stays open.
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
