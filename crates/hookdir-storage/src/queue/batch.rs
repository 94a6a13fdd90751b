//! Best-effort batch insert.

use hookdir_core::constants::MAX_LOGGED_INSERT_FAILURES;
use hookdir_core::HookRecord;
use rusqlite::Connection;

use crate::queries::hooks;
use crate::types::BatchOutcome;

/// Insert every record, one statement each. A rejected record is counted
/// and the batch continues; only the first few failures are logged
/// individually, followed by one summary line.
pub fn insert_batch(conn: &Connection, records: &[HookRecord], now: i64) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for record in records {
        match hooks::insert(conn, record, now) {
            Ok(_) => outcome.inserted += 1,
            Err(e) => {
                outcome.failed += 1;
                if outcome.failed <= MAX_LOGGED_INSERT_FAILURES {
                    tracing::warn!(hook = %record.hook_name, error = %e, "failed to insert hook record");
                }
            }
        }
    }

    if outcome.failed > 0 {
        tracing::warn!(
            "inserted {}, failed {} out of {}",
            outcome.inserted,
            outcome.failed,
            records.len()
        );
    } else {
        tracing::debug!(inserted = outcome.inserted, "batch inserted");
    }
    outcome
}
