//! # Scan Ingestion (pl-04)
//!
//! Turns a raw scan (device claim + token value) into a committed event and a
//! broadcast.
//!
//! ## Pipeline
//!
//! ```text
//! scan ─→ device claim check ─→ token present ─→ registry lookup
//!                                                      │
//!          ┌──────────── single pipeline lock ─────────┼──────────┐
//!          │  history() ─→ decide() ─→ append() ─→ publish_change  │
//!          └──────────────────────────────────────────────────────┘
//! ```
//!
//! Validation happens outside the lock; only the read-decide-append sequence
//! (and the notification that follows a commit) is serialized. Two scans of
//! the same token can never both read the same "last" event.
//!
//! ## Error Mapping
//!
//! | Error | HTTP | When |
//! |-------|------|------|
//! | `Unauthorized` | 401 | claim missing or wrong, or token empty |
//! | `NotRegistered` | 404 | token resolves to no identity |
//! | `StorageFailure` | 500 | registry or log unreadable, append failed |

pub mod domain;
pub mod service;

pub use domain::errors::{IngestError, UnauthorizedReason};
pub use domain::request::{IngestConfig, ScanRequest};
pub use service::{IngestionDependencies, IngestionService};
