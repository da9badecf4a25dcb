//! Event log adapters.

pub mod file;
#[cfg(feature = "locking")]
pub mod lock;
pub mod memory;

pub use file::FileEventLog;
#[cfg(feature = "locking")]
pub use lock::{DataDirLock, LockError};
pub use memory::InMemoryEventLog;
