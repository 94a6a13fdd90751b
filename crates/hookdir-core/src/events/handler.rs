//! HookDirEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for observing scan and queue activity.
///
/// All methods have no-op default implementations, so handlers only need
/// to override the events they care about. `Send + Sync` because the
/// scanner reports skipped files from its worker threads.
pub trait HookDirEventHandler: Send + Sync {
    // ---- Scan Lifecycle ----
    fn on_scan_started(&self, _event: &ScanStartedEvent) {}
    fn on_file_skipped(&self, _event: &FileSkippedEvent) {}
    fn on_scan_complete(&self, _event: &ScanCompleteEvent) {}

    // ---- Write Queue ----
    fn on_chunk_drained(&self, _event: &ChunkDrainedEvent) {}

    // ---- Errors ----
    fn on_error(&self, _event: &ErrorEvent) {}
}
