//! # JSON File Registry
//!
//! Registry stored as a JSON array of `{Id, Name, Value}` objects. The file is
//! administered out-of-band, so it is read fresh on every call.

use std::path::{Path, PathBuf};

use shared_types::Identity;
use tracing::debug;

use crate::errors::RegistryError;
use crate::ports::RegistryAccessor;

/// Registry backed by a JSON file that is re-read per call.
#[derive(Debug, Clone)]
pub struct JsonFileRegistry {
    path: PathBuf,
}

impl JsonFileRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegistryAccessor for JsonFileRegistry {
    fn identities(&self) -> Result<Vec<Identity>, RegistryError> {
        let raw = std::fs::read(&self.path).map_err(|e| RegistryError::Unavailable {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let identities: Vec<Identity> =
            serde_json::from_slice(&raw).map_err(|e| RegistryError::Malformed {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        debug!(
            path = %self.path.display(),
            count = identities.len(),
            "Registry read"
        );
        Ok(identities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::IdentityId;
    use tempfile::TempDir;

    fn write_registry(dir: &TempDir, body: &str) -> JsonFileRegistry {
        let path = dir.path().join("tags.json");
        std::fs::write(&path, body).unwrap();
        JsonFileRegistry::new(path)
    }

    #[test]
    fn test_lookup_trims_both_sides() {
        let dir = TempDir::new().unwrap();
        let registry = write_registry(
            &dir,
            r#"[{"Id": 1, "Name": "Alice", "Value": "  123456 "}]"#,
        );

        let found = registry.lookup("\t123456\r\n").unwrap().unwrap();
        assert_eq!(found.id, IdentityId::Numeric(1));
        assert_eq!(found.display_name, "Alice");
    }

    #[test]
    fn test_unregistered_token_is_none() {
        let dir = TempDir::new().unwrap();
        let registry = write_registry(&dir, r#"[{"Id": 1, "Name": "Alice", "Value": "123456"}]"#);

        assert!(registry.lookup("999999").unwrap().is_none());
    }

    #[test]
    fn test_registry_changes_are_seen_immediately() {
        let dir = TempDir::new().unwrap();
        let registry = write_registry(&dir, "[]");
        assert!(registry.lookup("AB").unwrap().is_none());

        std::fs::write(
            registry.path(),
            r#"[{"Id": "x", "Name": "Late", "Value": "AB"}]"#,
        )
        .unwrap();
        assert!(registry.lookup("AB").unwrap().is_some());
    }

    #[test]
    fn test_missing_file_is_unavailable_not_empty() {
        let dir = TempDir::new().unwrap();
        let registry = JsonFileRegistry::new(dir.path().join("absent.json"));

        assert!(matches!(
            registry.lookup("AB"),
            Err(RegistryError::Unavailable { .. })
        ));
    }

    #[test]
    fn test_garbage_file_is_malformed() {
        let dir = TempDir::new().unwrap();
        let registry = write_registry(&dir, "{ not a list");

        assert!(matches!(
            registry.identities(),
            Err(RegistryError::Malformed { .. })
        ));
    }
}
