//! Error handling for the hook directory.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod hookdir_error;
pub mod lex_error;
pub mod scan_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::HookDirErrorCode;
pub use hookdir_error::HookDirError;
pub use lex_error::LexError;
pub use scan_error::ScanError;
pub use storage_error::StorageError;
