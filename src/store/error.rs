//! Storage error types.

use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store operation failed: {0}")]
    Operation(String),

    #[error("Store could not be opened: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Store not initialized")]
    NotInitialized,

    #[error("Unknown partition '{0}'")]
    PartitionMissing(String),
}
