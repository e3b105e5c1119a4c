//! Quill Drafts
//!
//! Keeps the last unsent draft for each origin in local storage.
//! Every call reloads the table and every mutation writes it back;
//! storage failures never reach the caller.

mod config;
mod error;
mod keys;
mod manager;

pub use config::Config;
pub use error::DraftError;
pub use keys::StorageKey;
pub use manager::{DraftManager, DraftTable};

pub use quill_storage::{Database, KeyValueStore, MemoryStore, StorageError};

pub type Result<T> = std::result::Result<T, DraftError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
