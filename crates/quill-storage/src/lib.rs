//! Quill Storage Layer
//!
//! Synchronous string key-value stores backing the draft manager.
//! SQLite is the durable backend; `MemoryStore` is the ephemeral one.

mod database;
mod error;
mod memory;
mod migrations;
mod store;

pub use database::Database;
pub use error::StorageError;
pub use memory::MemoryStore;
pub use store::KeyValueStore;

pub type Result<T> = std::result::Result<T, StorageError>;
