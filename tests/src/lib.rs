//! # Presence-Ledger Test Suite
//!
//! Cross-crate tests that need more than one subsystem wired together.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs     # In-memory and on-disk wiring
//!     ├── flows.rs        # Scan → log → broadcast → query
//!     ├── concurrency.rs  # Parallel scans against the file log
//!     └── e2e.rs          # Real listeners, HTTP + WebSocket clients
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pl-tests
//! cargo test -p pl-tests integration::e2e::
//! ```

pub mod integration;
