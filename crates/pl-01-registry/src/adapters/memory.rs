use parking_lot::RwLock;
use shared_types::Identity;

use crate::errors::RegistryError;
use crate::ports::RegistryAccessor;

/// In-process registry. The identity list can be swapped at runtime to model
/// out-of-band administration.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    identities: RwLock<Vec<Identity>>,
}

impl InMemoryRegistry {
    pub fn new(identities: Vec<Identity>) -> Self {
        Self {
            identities: RwLock::new(identities),
        }
    }

    /// Replace the whole registry.
    pub fn replace(&self, identities: Vec<Identity>) {
        *self.identities.write() = identities;
    }
}

impl RegistryAccessor for InMemoryRegistry {
    fn identities(&self) -> Result<Vec<Identity>, RegistryError> {
        Ok(self.identities.read().clone())
    }
}
