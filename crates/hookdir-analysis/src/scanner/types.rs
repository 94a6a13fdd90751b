//! Scanner data types.

use hookdir_core::HookRecord;
use serde::{Deserialize, Serialize};

/// Counters for one scan invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub roots: usize,
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub records_found: usize,
    /// What the store reported handling; 0 when the replace failed.
    pub records_stored: usize,
    pub duration_ms: u64,
}

/// Records from a scan that has not been persisted.
#[derive(Debug, Clone, Default)]
pub struct CollectedRecords {
    pub records: Vec<HookRecord>,
    pub summary: ScanSummary,
}
