//! Draft error types
//!
//! Only opening a store can fail. Draft operations themselves never do.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DraftError {
    #[error("Storage error: {0}")]
    Storage(#[from] quill_storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
