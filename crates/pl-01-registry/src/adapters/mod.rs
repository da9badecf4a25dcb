//! Registry adapters.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileRegistry;
pub use memory::InMemoryRegistry;
