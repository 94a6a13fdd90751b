//! Queries for the options key/value table.

use hookdir_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension};

use super::sql_err;

const LAST_SCAN: &str = "last_scan";
const STATIC_GENERATION: &str = "static_generation";

pub fn get(conn: &Connection, name: &str) -> Result<Option<String>, StorageError> {
    conn.query_row(
        "SELECT value FROM options WHERE name = ?1",
        params![name],
        |row| row.get(0),
    )
    .optional()
    .map_err(sql_err)
}

pub fn set(conn: &Connection, name: &str, value: &str) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO options (name, value) VALUES (?1, ?2)
         ON CONFLICT(name) DO UPDATE SET value = excluded.value",
        params![name, value],
    )
    .map_err(sql_err)?;
    Ok(())
}

fn get_i64(conn: &Connection, name: &str) -> Result<i64, StorageError> {
    Ok(get(conn, name)?
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(0))
}

/// Unix seconds of the last completed scan, 0 when never scanned.
pub fn last_scan(conn: &Connection) -> Result<i64, StorageError> {
    get_i64(conn, LAST_SCAN)
}

pub fn set_last_scan(conn: &Connection, at: i64) -> Result<(), StorageError> {
    set(conn, LAST_SCAN, &at.to_string())
}

/// Generation of the most recent static replacement. Queued chunks from
/// other generations are stale.
pub fn static_generation(conn: &Connection) -> Result<i64, StorageError> {
    get_i64(conn, STATIC_GENERATION)
}

pub fn set_static_generation(conn: &Connection, generation: i64) -> Result<(), StorageError> {
    set(conn, STATIC_GENERATION, &generation.to_string())
}
