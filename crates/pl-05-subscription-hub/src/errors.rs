use thiserror::Error;

use crate::hub::ObserverId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    #[error("Observer limit reached ({limit})")]
    Full { limit: usize },

    #[error("Observer {0} is not subscribed")]
    UnknownObserver(ObserverId),

    /// The observer was removed while delivering to it.
    #[error("Observer {0} was evicted")]
    Evicted(ObserverId),

    #[error("Frame encoding failed: {0}")]
    Encoding(String),
}
