//! Write-side traits the scanner and sampler persist through.
//!
//! The analysis crate never sees a database: it hands records to whatever
//! implements these, which lets tests substitute an in-memory store.

use crate::errors::StorageError;
use crate::types::HookRecord;

/// Single-record append, used by the runtime sampler.
pub trait RecordSink {
    /// Append one record. Absent timestamps are filled with the insert time.
    fn insert_record(&self, record: &HookRecord) -> Result<(), StorageError>;
}

/// Wholesale replacement of static records, used by the scan orchestrator.
pub trait StaticReplace {
    /// Replace every static record with `records`.
    ///
    /// Returns `records.len()` when the replacement was accepted (the tail may
    /// still be draining in the background) and 0 when storage failed.
    fn replace_static_entries(&self, records: Vec<HookRecord>) -> usize;

    /// Record when the last successful scan finished, in unix seconds.
    fn record_last_scan(&self, at: i64);
}
