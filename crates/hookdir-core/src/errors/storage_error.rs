//! Storage errors.

use super::error_code::{self, HookDirErrorCode};

/// Errors raised by the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Migration to v{version} failed: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Queue payload error: {message}")]
    PayloadError { message: String },
}

impl HookDirErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            StorageError::SqliteError { .. } => error_code::STORAGE_ERROR,
            StorageError::MigrationFailed { .. } => error_code::MIGRATION_ERROR,
            StorageError::PayloadError { .. } => error_code::QUEUE_PAYLOAD_ERROR,
        }
    }
}
