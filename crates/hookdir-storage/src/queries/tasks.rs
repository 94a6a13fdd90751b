//! Queries for the scheduled_tasks table.

use hookdir_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension};

use super::sql_err;

/// Schedule `task` at `due_at` unless an occurrence is already pending.
/// Returns whether a new occurrence was scheduled.
pub fn schedule_once(conn: &Connection, task: &str, due_at: i64) -> Result<bool, StorageError> {
    let n = conn
        .execute(
            "INSERT OR IGNORE INTO scheduled_tasks (task, due_at) VALUES (?1, ?2)",
            params![task, due_at],
        )
        .map_err(sql_err)?;
    Ok(n > 0)
}

pub fn is_pending(conn: &Connection, task: &str) -> Result<bool, StorageError> {
    Ok(next_due(conn, task)?.is_some())
}

pub fn next_due(conn: &Connection, task: &str) -> Result<Option<i64>, StorageError> {
    conn.query_row(
        "SELECT due_at FROM scheduled_tasks WHERE task = ?1",
        params![task],
        |row| row.get(0),
    )
    .optional()
    .map_err(sql_err)
}

/// Claim `task` if it is due at `now`. A claimed occurrence is removed, so
/// the task may schedule its own follow-up.
pub fn take_due(conn: &Connection, task: &str, now: i64) -> Result<bool, StorageError> {
    let n = conn
        .execute(
            "DELETE FROM scheduled_tasks WHERE task = ?1 AND due_at <= ?2",
            params![task, now],
        )
        .map_err(sql_err)?;
    Ok(n > 0)
}
