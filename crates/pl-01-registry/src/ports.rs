//! Outbound port for registry access.

use crate::errors::RegistryError;
use shared_types::Identity;

/// Read-only access to the tag registry.
pub trait RegistryAccessor: Send + Sync {
    /// Every registered identity, in registry order.
    fn identities(&self) -> Result<Vec<Identity>, RegistryError>;

    /// Resolve a token value to its identity.
    ///
    /// Returns `Ok(None)` when nothing is registered under the token.
    /// Both the argument and the registered values are trimmed.
    fn lookup(&self, token: &str) -> Result<Option<Identity>, RegistryError> {
        let token = token.trim();
        Ok(self
            .identities()?
            .into_iter()
            .find(|identity| identity.matches_token(token)))
    }
}
