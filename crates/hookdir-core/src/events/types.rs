//! Event payload types.

use std::path::PathBuf;

/// Payload for `on_scan_started`.
#[derive(Debug, Clone)]
pub struct ScanStartedEvent {
    pub roots: Vec<PathBuf>,
    pub file_count: usize,
}

/// Payload for `on_file_skipped`.
#[derive(Debug, Clone)]
pub struct FileSkippedEvent {
    pub path: PathBuf,
    pub reason: String,
}

/// Payload for `on_scan_complete`.
#[derive(Debug, Clone)]
pub struct ScanCompleteEvent {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub records_found: usize,
    /// Records the store accepted; 0 when the replace failed.
    pub records_stored: usize,
    pub duration_ms: u64,
}

/// Payload for `on_chunk_drained`.
#[derive(Debug, Clone)]
pub struct ChunkDrainedEvent {
    pub chunk_id: i64,
    pub inserted: usize,
    pub failed: usize,
    /// True when the chunk belonged to a superseded scan and was dropped.
    pub stale: bool,
    pub remaining_chunks: usize,
}

/// Payload for `on_error`.
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    pub message: String,
    pub error_code: String,
}
