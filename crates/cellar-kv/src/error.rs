//! Storage error types.

use thiserror::Error;

/// Errors that can occur when using a state store.
#[derive(Error, Debug)]
pub enum KvError {
    /// Failed to open the backing store.
    #[error("Failed to open store: {0}")]
    Open(String),

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to read from the backing store.
    #[error("Read failed: {0}")]
    Read(String),

    /// Failed to write to the backing store.
    #[error("Write failed: {0}")]
    Write(String),
}
