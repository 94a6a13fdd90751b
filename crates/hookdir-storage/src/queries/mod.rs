//! SQL queries, one module per table.

pub mod hooks;
pub mod options;
pub mod queue;
pub mod tasks;

use hookdir_core::errors::StorageError;

pub(crate) fn sql_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}
