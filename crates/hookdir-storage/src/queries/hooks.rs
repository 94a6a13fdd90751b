//! Queries for the hook_entries table.

use std::collections::BTreeMap;

use hookdir_core::errors::StorageError;
use hookdir_core::{DetectionMethod, HookRecord, HookType, SourceType};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, Row};

use super::sql_err;
use crate::types::{HookFilter, HookRow};

const COLUMNS: &str = "id, hook_name, hook_type, file_path, line, source_type, source_name, \
                       detection_method, first_seen, last_seen";

/// Insert one record. Missing timestamps are filled with `now`.
pub fn insert(conn: &Connection, record: &HookRecord, now: i64) -> Result<i64, StorageError> {
    let first_seen = record.first_seen.unwrap_or(now);
    let last_seen = record.last_seen.unwrap_or(now);
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO hook_entries
                (hook_name, hook_type, file_path, line, source_type, source_name,
                 detection_method, first_seen, last_seen)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .map_err(sql_err)?;
    stmt.execute(params![
        record.hook_name,
        record.hook_type.as_str(),
        record.file_path,
        record.line,
        record.source_type.as_str(),
        record.source_name,
        record.detection_method.as_str(),
        first_seen,
        last_seen,
    ])
    .map_err(sql_err)?;
    Ok(conn.last_insert_rowid())
}

/// Delete every record found by `method`. Returns the number deleted.
pub fn delete_by_method(conn: &Connection, method: DetectionMethod) -> Result<usize, StorageError> {
    conn.execute(
        "DELETE FROM hook_entries WHERE detection_method = ?1",
        params![method.as_str()],
    )
    .map_err(sql_err)
}

/// Delete `method` records last seen before `cutoff`.
pub fn delete_seen_before(
    conn: &Connection,
    method: DetectionMethod,
    cutoff: i64,
) -> Result<usize, StorageError> {
    conn.execute(
        "DELETE FROM hook_entries WHERE detection_method = ?1 AND last_seen < ?2",
        params![method.as_str(), cutoff],
    )
    .map_err(sql_err)
}

pub fn count_by_method(conn: &Connection, method: DetectionMethod) -> Result<u64, StorageError> {
    conn.query_row(
        "SELECT COUNT(*) FROM hook_entries WHERE detection_method = ?1",
        params![method.as_str()],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(sql_err)
}

pub fn count_all(conn: &Connection) -> Result<u64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM hook_entries", [], |row| row.get::<_, i64>(0))
        .map(|n| n as u64)
        .map_err(sql_err)
}

/// One page of records matching `filter`, ordered by name then id, plus the
/// total number of matches.
pub fn list(conn: &Connection, filter: &HookFilter) -> Result<(u64, Vec<HookRow>), StorageError> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        clauses.push("hook_name LIKE ? ESCAPE '\\'");
        values.push(Value::Text(format!("%{}%", escape_like(search))));
    }
    if let Some(hook_type) = filter.hook_type {
        clauses.push("hook_type = ?");
        values.push(Value::Text(hook_type.as_str().to_string()));
    }
    if let Some(source_type) = filter.source_type {
        clauses.push("source_type = ?");
        values.push(Value::Text(source_type.as_str().to_string()));
    }
    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    let total: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM hook_entries{where_sql}"),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )
        .map_err(sql_err)?;

    values.push(Value::Integer(i64::from(filter.limit)));
    values.push(Value::Integer(filter.offset.min(i64::MAX as u64) as i64));
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM hook_entries{where_sql}
             ORDER BY hook_name ASC, id ASC LIMIT ? OFFSET ?"
        ))
        .map_err(sql_err)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), map_row)
        .map_err(sql_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sql_err)?;

    Ok((total as u64, rows))
}

/// Every record ordered by name then id.
pub fn all_by_name(conn: &Connection) -> Result<Vec<HookRow>, StorageError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM hook_entries ORDER BY hook_name ASC, id ASC"
        ))
        .map_err(sql_err)?;
    let rows = stmt
        .query_map([], map_row)
        .map_err(sql_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sql_err)?;
    Ok(rows)
}

/// Record counts grouped by hook type.
pub fn counts_by_type(conn: &Connection) -> Result<BTreeMap<String, u64>, StorageError> {
    grouped_counts(conn, "hook_type")
}

/// Record counts grouped by source type; unattributed records count under "".
pub fn counts_by_source(conn: &Connection) -> Result<BTreeMap<String, u64>, StorageError> {
    grouped_counts(conn, "source_type")
}

fn grouped_counts(conn: &Connection, column: &str) -> Result<BTreeMap<String, u64>, StorageError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {column}, COUNT(*) FROM hook_entries GROUP BY {column}"
        ))
        .map_err(sql_err)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))
        .map_err(sql_err)?;
    let mut counts = BTreeMap::new();
    for row in rows {
        let (key, n) = row.map_err(sql_err)?;
        counts.insert(key, n as u64);
    }
    Ok(counts)
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<HookRow> {
    let method: String = row.get(7)?;
    let detection_method = DetectionMethod::parse(&method).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            7,
            Type::Text,
            format!("unknown detection method '{method}'").into(),
        )
    })?;
    Ok(HookRow {
        id: row.get(0)?,
        record: HookRecord {
            hook_name: row.get(1)?,
            hook_type: HookType::parse(&row.get::<_, String>(2)?),
            file_path: row.get(3)?,
            line: row.get(4)?,
            source_type: SourceType::parse(&row.get::<_, String>(5)?),
            source_name: row.get(6)?,
            detection_method,
            first_seen: row.get(8)?,
            last_seen: row.get(9)?,
        },
    })
}

/// Escape `%`, `_` and `\` for use with `LIKE ... ESCAPE '\'`.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
