//! Custom error types for the common library
//!
//! This module defines the errors raised by the session storage backends
//! and by settings loading.

use redis::RedisError;
use thiserror::Error;

/// Custom error type for session storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error occurred while reading or writing the backing file
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted document could not be encoded or decoded
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error returned by the Redis server or connection
    #[error("Redis error: {0}")]
    Redis(#[source] RedisError),

    /// Configuration error
    #[error("Storage configuration error: {0}")]
    Configuration(String),
}

impl From<RedisError> for StorageError {
    fn from(e: RedisError) -> Self {
        StorageError::Redis(e)
    }
}

/// Type alias for Result with StorageError
pub type StorageResult<T> = Result<T, StorageError>;
