//! # Event Log Store (pl-02)
//!
//! The event log is the single source of truth for presence. Current state is
//! never stored separately; it is derived from the ordered history.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Append-only | Events are never mutated or deleted once committed |
//! | 2 | Durable commit | `append` returns only after the medium is synced |
//! | 3 | Total history | `history` returns the whole log or an error, never a prefix |
//! | 4 | Loud failure | Unreadable or corrupt logs are errors, never "empty" |
//! | 5 | Single creation | A missing log is created empty once, on first access |
//!
//! ## Crate Structure
//!
//! - `ports` - `EventLogStore` trait
//! - `adapters/file` - JSON array file with atomic rewrite and snapshot-on-append
//! - `adapters/memory` - volatile log with an injectable failure switch
//! - `adapters/lock` - exclusive data directory lock (feature `locking`)

pub mod adapters;
pub mod errors;
pub mod ports;

pub use adapters::{FileEventLog, InMemoryEventLog};
#[cfg(feature = "locking")]
pub use adapters::{DataDirLock, LockError};
pub use errors::StorageError;
pub use ports::EventLogStore;
