//! Stable error codes carried by `ErrorEvent` and surfaced to the host.

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const LEX_ERROR: &str = "LEX_ERROR";
pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_ERROR: &str = "MIGRATION_ERROR";
pub const QUEUE_PAYLOAD_ERROR: &str = "QUEUE_PAYLOAD_ERROR";
pub const INIT_ERROR: &str = "INIT_ERROR";

/// Maps an error to its stable code.
pub trait HookDirErrorCode {
    fn error_code(&self) -> &'static str;
}
