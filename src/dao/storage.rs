//! Storage error types shared by every store implementation.

use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying technology.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or refused the operation.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human readable cause.
        message: String,
        /// Backend error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A record with the same identifier already exists.
    #[error("record `{id}` already exists")]
    Conflict {
        /// Identifier already taken.
        id: String,
    },
    /// A stored payload could not be read back.
    #[error("stored record is corrupt")]
    Corrupt(#[from] serde_json::Error),
    /// A stored payload was written by a newer schema.
    #[error("unsupported record schema version {version}")]
    UnsupportedSchema {
        /// Version found in the payload.
        version: u32,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}
