//! Cross-subsystem integration tests.

#[cfg(test)]
mod fixtures;

mod concurrency;
mod e2e;
mod flows;
