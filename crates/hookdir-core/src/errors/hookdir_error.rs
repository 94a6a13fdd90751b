//! Top-level error for the facade: aggregates subsystem errors via `From`.

use super::error_code::{self, HookDirErrorCode};
use super::{ConfigError, ScanError, StorageError};

/// Errors surfaced by `HookDirectory` operations that are allowed to fail
/// (setup and read queries). `scan()` and `replace_static_entries()` never
/// return this: they report counts.
#[derive(Debug, thiserror::Error)]
pub enum HookDirError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Initialization failed: {message}")]
    Init { message: String },
}

impl HookDirErrorCode for HookDirError {
    fn error_code(&self) -> &'static str {
        match self {
            HookDirError::Config(e) => e.error_code(),
            HookDirError::Storage(e) => e.error_code(),
            HookDirError::Scan(e) => e.error_code(),
            HookDirError::Init { .. } => error_code::INIT_ERROR,
        }
    }
}
