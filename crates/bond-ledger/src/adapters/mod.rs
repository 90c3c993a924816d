//! # Adapters Module
//!
//! Implementations of the outbound ports.
//!
//! ## Modules
//!
//! - `storage`: `KeyValueStore` backends (in-memory, single file)
//! - `infra`: System clock

pub mod infra;
pub mod storage;

pub use infra::SystemTimeSource;
pub use storage::{FileBackedKVStore, InMemoryKVStore};
