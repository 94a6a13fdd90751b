//! SqliteScheduler — durable one-shot task schedule.
//!
//! The host owns the clock: it calls `take_due` (through
//! `HookDirectory::run_due_tasks`) from its own cron or tick, and this type
//! only answers "is it pending" and "is it due".

use std::sync::Arc;

use hookdir_core::errors::StorageError;
use hookdir_core::traits::TaskScheduler;

use crate::connection::DatabaseManager;
use crate::queries::tasks;

/// Task schedule stored in the `scheduled_tasks` table. At most one
/// occurrence per task name can be pending.
#[derive(Clone)]
pub struct SqliteScheduler {
    db: Arc<DatabaseManager>,
}

impl SqliteScheduler {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Claim `task` if an occurrence is due at `now`. The claimed occurrence
    /// is removed before the task runs.
    pub fn take_due(&self, task: &str, now: i64) -> Result<bool, StorageError> {
        self.db.with_writer(|conn| tasks::take_due(conn, task, now))
    }

    pub fn next_due(&self, task: &str) -> Result<Option<i64>, StorageError> {
        self.db.with_reader(|conn| tasks::next_due(conn, task))
    }
}

impl TaskScheduler for SqliteScheduler {
    fn is_pending(&self, task: &str) -> bool {
        match self.db.with_reader(|conn| tasks::is_pending(conn, task)) {
            Ok(pending) => pending,
            Err(e) => {
                tracing::warn!(task, error = %e, "failed to read task schedule");
                false
            }
        }
    }

    fn schedule_once(&self, task: &str, due_at: i64) {
        match self.db.with_writer(|conn| tasks::schedule_once(conn, task, due_at)) {
            Ok(true) => tracing::debug!(task, due_at, "task scheduled"),
            Ok(false) => tracing::debug!(task, "task already pending"),
            Err(e) => tracing::warn!(task, error = %e, "failed to schedule task"),
        }
    }
}
