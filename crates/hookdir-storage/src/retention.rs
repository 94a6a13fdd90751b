//! Runtime record expiry. Only ever run on explicit request.

use hookdir_core::errors::StorageError;
use hookdir_core::DetectionMethod;
use rusqlite::Connection;

use crate::connection::writer::with_immediate_transaction;
use crate::queries::hooks;

const SECS_PER_DAY: i64 = 86_400;

/// Result of a retention purge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionReport {
    pub deleted: usize,
    /// Runtime records last seen before this instant were removed.
    pub cutoff: i64,
}

/// Delete runtime records whose `last_seen` is more than `expiry_days`
/// before `now`. Static records are never touched.
pub fn purge_expired_runtime(
    conn: &Connection,
    expiry_days: u32,
    now: i64,
) -> Result<RetentionReport, StorageError> {
    let cutoff = now.saturating_sub(i64::from(expiry_days.max(1)) * SECS_PER_DAY);
    with_immediate_transaction(conn, |tx| {
        let deleted = hooks::delete_seen_before(tx, DetectionMethod::Runtime, cutoff)?;
        tracing::info!(deleted, cutoff, "expired runtime records purged");
        Ok(RetentionReport { deleted, cutoff })
    })
}
