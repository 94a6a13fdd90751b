//! Queries for the write_queue table.

use hookdir_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension};

use super::sql_err;

/// A queued chunk as stored. The payload is a JSON array of records.
#[derive(Debug, Clone)]
pub struct QueuedChunk {
    pub id: i64,
    pub generation: i64,
    pub payload: String,
    pub record_count: usize,
}

pub fn enqueue_chunk(
    conn: &Connection,
    generation: i64,
    payload: &str,
    record_count: usize,
    now: i64,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO write_queue (generation, payload, record_count, enqueued_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![generation, payload, record_count as i64, now],
    )
    .map_err(sql_err)?;
    Ok(conn.last_insert_rowid())
}

/// Remove and return the oldest chunk, if any.
pub fn pop_oldest(conn: &Connection) -> Result<Option<QueuedChunk>, StorageError> {
    let chunk = conn
        .query_row(
            "SELECT id, generation, payload, record_count FROM write_queue
             ORDER BY id ASC LIMIT 1",
            [],
            |row| {
                Ok(QueuedChunk {
                    id: row.get(0)?,
                    generation: row.get(1)?,
                    payload: row.get(2)?,
                    record_count: row.get::<_, i64>(3)?.max(0) as usize,
                })
            },
        )
        .optional()
        .map_err(sql_err)?;

    if let Some(chunk) = &chunk {
        conn.execute("DELETE FROM write_queue WHERE id = ?1", params![chunk.id])
            .map_err(sql_err)?;
    }
    Ok(chunk)
}

pub fn queue_len(conn: &Connection) -> Result<usize, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM write_queue", [], |row| row.get::<_, i64>(0))
        .map(|n| n as usize)
        .map_err(sql_err)
}

/// Drop chunks belonging to generations older than `generation`.
pub fn delete_before_generation(conn: &Connection, generation: i64) -> Result<usize, StorageError> {
    conn.execute(
        "DELETE FROM write_queue WHERE generation < ?1",
        params![generation],
    )
    .map_err(sql_err)
}
