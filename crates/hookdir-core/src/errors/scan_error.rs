//! Scanner errors.

use std::path::PathBuf;

use super::error_code::{self, HookDirErrorCode};

/// Errors that can occur while reading a single source file.
/// All of them are recoverable-skip: the scan logs and moves on.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("IO error scanning {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },
}

impl ScanError {
    /// Classify an IO failure for `path`.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied { path }
        } else {
            Self::IoError { path, source }
        }
    }
}

impl HookDirErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        error_code::SCAN_ERROR
    }
}
