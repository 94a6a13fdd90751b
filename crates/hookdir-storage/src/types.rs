//! Result and row types for the persistence layer.

use std::collections::BTreeMap;

use hookdir_core::{HookRecord, HookType, SourceType};
use serde::Serialize;

/// A stored hook record with its surrogate key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookRow {
    pub id: i64,
    #[serde(flatten)]
    pub record: HookRecord,
}

/// Filters for catalogue listings. All filters combine with AND.
#[derive(Debug, Clone, Default)]
pub struct HookFilter {
    /// Substring match on the hook name.
    pub search: Option<String>,
    pub hook_type: Option<HookType>,
    pub source_type: Option<SourceType>,
    pub limit: u32,
    pub offset: u64,
}

/// Outcome of a best-effort batch insert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub inserted: usize,
    pub failed: usize,
}

impl BatchOutcome {
    pub fn attempted(&self) -> usize {
        self.inserted + self.failed
    }
}

/// Outcome of one drain tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrainOutcome {
    /// The chunk processed, `None` when the queue was empty.
    pub chunk_id: Option<i64>,
    pub inserted: usize,
    pub failed: usize,
    /// The chunk came from a superseded scan and was dropped.
    pub stale: bool,
    pub remaining_chunks: usize,
    /// A follow-up tick was scheduled.
    pub rescheduled: bool,
}

/// Catalogue summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HookStats {
    pub total: u64,
    pub by_type: BTreeMap<String, u64>,
    pub by_source: BTreeMap<String, u64>,
    /// Unix seconds of the last completed scan, 0 when never scanned.
    pub last_scan: i64,
}
