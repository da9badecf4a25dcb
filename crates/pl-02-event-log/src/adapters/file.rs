//! # File Event Log
//!
//! Persists the log as a pretty-printed JSON array of `{TagId, Time, Dir}`.
//!
//! ## Write Path
//!
//! 1. Build the next log (current snapshot + new event)
//! 2. Write it to a sibling temp file and `fsync`
//! 3. Rename over the log, then `fsync` the parent directory
//! 4. Publish the new snapshot
//!
//! A failure in steps 1 or 2, or in the rename, leaves both the file and the
//! published snapshot as they were. Once the rename has happened the new log
//! is the log: a failed directory `fsync` is logged and the append still
//! counts as committed, so the snapshot never lags what is on disk.

use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use shared_types::Event;
use tracing::{debug, info, warn};

use crate::errors::StorageError;
use crate::ports::EventLogStore;

/// JSON-file event log with snapshot-on-append.
pub struct FileEventLog {
    path: PathBuf,
    /// `None` until the first successful load.
    snapshot: RwLock<Option<Arc<Vec<Event>>>>,
    /// Serializes writers so only one rewrite is in flight.
    write_lock: Mutex<()>,
    dir_sync: fn(&Path) -> Result<(), StorageError>,
}

impl FileEventLog {
    /// Create a handle. Nothing is touched on disk until first access.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            snapshot: RwLock::new(None),
            write_lock: Mutex::new(()),
            dir_sync: sync_parent_dir,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current snapshot, loading (or creating) the log on first use.
    ///
    /// Initialization runs under the write lock so concurrent first callers
    /// cannot both create the file. A failed load is not cached.
    fn snapshot(&self) -> Result<Arc<Vec<Event>>, StorageError> {
        if let Some(events) = self.snapshot.read().as_ref() {
            return Ok(Arc::clone(events));
        }

        let mut slot = self.snapshot.write();
        if let Some(events) = slot.as_ref() {
            return Ok(Arc::clone(events));
        }

        let events = Arc::new(self.load_or_create()?);
        *slot = Some(Arc::clone(&events));
        Ok(events)
    }

    fn load_or_create(&self) -> Result<Vec<Event>, StorageError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => {
                let events: Vec<Event> =
                    serde_json::from_slice(&bytes).map_err(|e| StorageError::Corrupt {
                        path: self.path.clone(),
                        reason: e.to_string(),
                    })?;
                info!(
                    path = %self.path.display(),
                    events = events.len(),
                    "Loaded event log"
                );
                Ok(events)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.persist(&[])?;
                info!(path = %self.path.display(), "Created empty event log");
                Ok(Vec::new())
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Event log unreadable");
                Err(StorageError::io(&self.path, e))
            }
        }
    }

    /// Atomically replace the log file with `events`.
    fn persist(&self, events: &[Event]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let bytes = serde_json::to_vec_pretty(events).map_err(|e| StorageError::Io {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = File::create(&temp_path).map_err(|e| StorageError::io(&temp_path, e))?;
        file.write_all(&bytes)
            .map_err(|e| StorageError::io(&temp_path, e))?;
        file.sync_all().map_err(|e| StorageError::io(&temp_path, e))?;
        drop(file);

        if let Err(e) = std::fs::rename(&temp_path, &self.path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(StorageError::io(&self.path, e));
        }

        if let Err(e) = (self.dir_sync)(&self.path) {
            warn!(
                path = %self.path.display(),
                error = %e,
                "Log replaced but directory fsync failed"
            );
        }
        Ok(())
    }
}

/// Make the rename itself durable.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> Result<(), StorageError> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent,
        None => Path::new("."),
    };
    File::open(parent)
        .and_then(|dir| dir.sync_all())
        .map_err(|e| StorageError::io(parent, e))
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> Result<(), StorageError> {
    Ok(())
}

impl EventLogStore for FileEventLog {
    fn history(&self) -> Result<Arc<Vec<Event>>, StorageError> {
        self.snapshot()
    }

    fn append(&self, event: Event) -> Result<Event, StorageError> {
        let _writer = self.write_lock.lock();
        let current = self.snapshot()?;

        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        next.push(event.clone());

        self.persist(&next)?;
        *self.snapshot.write() = Some(Arc::new(next));

        debug!(
            identity = %event.identity_id,
            direction = %event.direction,
            time = event.timestamp,
            "Event committed"
        );
        Ok(event)
    }
}
