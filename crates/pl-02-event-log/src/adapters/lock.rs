//! # Data Directory Lock
//!
//! The log has exactly one writer process. The node takes an exclusive `fs2`
//! lock on `<data_dir>/LOCK` at startup and keeps it until exit.
//!
//! The flock is the only source of truth: the kernel drops it when the owner
//! dies, so a failed `try_lock_exclusive` always means a live holder. The PID
//! written into the file is informational and only shows up in errors. The
//! file itself is never unlinked; every process locks the same inode.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;
use tracing::{info, warn};

/// How long `acquire` keeps retrying a held lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors from data directory locking
#[derive(Debug)]
pub enum LockError {
    /// Lock file could not be opened
    Open(io::Error),
    /// Another live process owns the data directory
    Held { pid: Option<u32>, path: PathBuf },
    /// Lock acquired but the owner PID could not be recorded
    Record(io::Error),
}

impl std::fmt::Display for LockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockError::Open(e) => write!(f, "Cannot open lock file: {}", e),
            LockError::Held {
                pid: Some(pid),
                path,
            } => write!(
                f,
                "Data directory locked by process {} ({})",
                pid,
                path.display()
            ),
            LockError::Held { pid: None, path } => {
                write!(f, "Data directory locked ({})", path.display())
            }
            LockError::Record(e) => write!(f, "Cannot record owner PID: {}", e),
        }
    }
}

impl std::error::Error for LockError {}

// =============================================================================
// DATA DIRECTORY LOCK
// =============================================================================

/// Exclusive ownership of a data directory, released on drop.
#[derive(Debug)]
pub struct DataDirLock {
    file: File,
    path: PathBuf,
    pid: u32,
}

impl DataDirLock {
    const LOCK_FILE: &'static str = "LOCK";

    /// Acquire with [`DEFAULT_LOCK_TIMEOUT`].
    pub fn acquire(data_dir: &Path) -> Result<Self, LockError> {
        Self::acquire_with_timeout(data_dir, DEFAULT_LOCK_TIMEOUT)
    }

    /// Acquire the lock, retrying with backoff until `timeout` elapses.
    pub fn acquire_with_timeout(data_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        std::fs::create_dir_all(data_dir).map_err(LockError::Open)?;

        let lock_path = data_dir.join(Self::LOCK_FILE);
        let deadline = Instant::now() + timeout;
        let mut delay = Duration::from_millis(25);

        loop {
            // No truncate here: the current owner's PID must stay readable.
            let file = OpenOptions::new()
                .create(true)
                .truncate(false)
                .read(true)
                .write(true)
                .open(&lock_path)
                .map_err(LockError::Open)?;

            if file.try_lock_exclusive().is_ok() {
                let pid = std::process::id();
                let mut file = file;
                file.set_len(0).map_err(LockError::Record)?;
                writeln!(file, "{}", pid).map_err(LockError::Record)?;
                file.sync_all().map_err(LockError::Record)?;

                info!(path = %lock_path.display(), pid, "Data directory locked");
                return Ok(Self {
                    file,
                    path: lock_path,
                    pid,
                });
            }
            drop(file);

            if Instant::now() >= deadline {
                let owner = read_owner_pid(&lock_path);
                warn!(
                    path = %lock_path.display(),
                    owner = ?owner,
                    "Data directory held by another process"
                );
                return Err(LockError::Held {
                    pid: owner,
                    path: lock_path,
                });
            }

            std::thread::sleep(delay);
            delay = (delay * 2).min(Duration::from_millis(500));
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DataDirLock {
    fn drop(&mut self) {
        // Clear the PID while still holding the lock; the file stays.
        let _ = self.file.set_len(0);
        let _ = FileExt::unlock(&self.file);
    }
}

fn read_owner_pid(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
}
