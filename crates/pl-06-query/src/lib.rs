//! # Query Service (pl-06)
//!
//! Read-only views for observers.
//!
//! | Operation | Wire action | Result |
//! |-----------|-------------|--------|
//! | `registry_with_state` | `GetTags` | every identity, plus `CurrentDir` when it has events |
//! | `history` | `GetEntries` | the full ordered event list |
//!
//! Both read the registry as it is right now and one immutable log snapshot,
//! so they never take the ingestion lock and never see a half-applied append.

pub mod errors;
pub mod service;

pub use errors::QueryError;
pub use service::QueryService;
