//! HookCache — synchronous first batch plus a durable chunk queue.
//!
//! A static replacement runs in one immediate transaction: clear the static
//! rows, bump the static generation, drop chunks left over from earlier
//! generations, insert the first `CHUNK_SIZE` records and enqueue the rest.
//! Each drain tick then pops exactly one chunk in its own transaction and
//! schedules the next tick while work remains.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hookdir_core::constants::{CHUNK_SIZE, DRAIN_RESCHEDULE_DELAY_SECS, DRAIN_TASK};
use hookdir_core::errors::{HookDirErrorCode, StorageError};
use hookdir_core::events::types::{ChunkDrainedEvent, ErrorEvent};
use hookdir_core::events::EventDispatcher;
use hookdir_core::time::unix_now;
use hookdir_core::traits::{RecordSink, StaticReplace, TaskScheduler};
use hookdir_core::{DetectionMethod, HookRecord};

use super::batch::insert_batch;
use crate::connection::writer::with_immediate_transaction;
use crate::connection::DatabaseManager;
use crate::docs::render_markdown;
use crate::queries::{hooks, options, queue as write_queue};
use crate::retention::{self, RetentionReport};
use crate::types::{BatchOutcome, DrainOutcome, HookFilter, HookRow, HookStats};

/// The write path and read side of the hook catalogue.
pub struct HookCache {
    db: Arc<DatabaseManager>,
    scheduler: Arc<dyn TaskScheduler>,
    events: EventDispatcher,
}

impl HookCache {
    pub fn new(db: Arc<DatabaseManager>, scheduler: Arc<dyn TaskScheduler>) -> Self {
        Self {
            db,
            scheduler,
            events: EventDispatcher::new(),
        }
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.events = events;
        self
    }

    pub fn db(&self) -> &Arc<DatabaseManager> {
        &self.db
    }

    /// Best-effort insert of `records` in one transaction. When the
    /// transaction itself cannot be opened every record counts as failed.
    pub fn insert_batch(&self, records: &[HookRecord]) -> BatchOutcome {
        let now = unix_now();
        let result = self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| Ok(insert_batch(tx, records, now)))
        });
        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                self.report_error("batch insert failed", &e);
                BatchOutcome {
                    inserted: 0,
                    failed: records.len(),
                }
            }
        }
    }

    /// Pop the oldest queued chunk and insert it. Schedules the next tick
    /// `DRAIN_RESCHEDULE_DELAY_SECS` after `now` while chunks remain; an
    /// empty queue schedules nothing.
    ///
    /// A failed tick leaves its chunk queued and schedules a retry.
    pub fn drain_one_chunk(&self, now: i64) -> Result<DrainOutcome, StorageError> {
        let result = self
            .db
            .with_writer(|conn| with_immediate_transaction(conn, |tx| drain_in(tx, now)));

        let mut outcome = match result {
            Ok(Some(outcome)) => outcome,
            Ok(None) => {
                tracing::debug!("write queue empty");
                return Ok(DrainOutcome::default());
            }
            Err(e) => {
                self.report_error("queue drain failed", &e);
                self.ensure_drain_scheduled(now + DRAIN_RESCHEDULE_DELAY_SECS);
                return Err(e);
            }
        };

        if outcome.remaining_chunks > 0 {
            outcome.rescheduled = self.ensure_drain_scheduled(now + DRAIN_RESCHEDULE_DELAY_SECS);
        }

        let chunk_id = outcome.chunk_id.unwrap_or_default();
        tracing::info!(
            chunk_id,
            inserted = outcome.inserted,
            failed = outcome.failed,
            stale = outcome.stale,
            remaining = outcome.remaining_chunks,
            "queue chunk drained"
        );
        self.events.emit_chunk_drained(&ChunkDrainedEvent {
            chunk_id,
            inserted: outcome.inserted,
            failed: outcome.failed,
            stale: outcome.stale,
            remaining_chunks: outcome.remaining_chunks,
        });
        Ok(outcome)
    }

    /// Number of chunks waiting to be drained.
    pub fn queue_len(&self) -> Result<usize, StorageError> {
        self.db.with_reader(write_queue::queue_len)
    }

    pub fn list(&self, filter: &HookFilter) -> Result<(u64, Vec<HookRow>), StorageError> {
        self.db.with_reader(|conn| hooks::list(conn, filter))
    }

    pub fn count(&self, method: DetectionMethod) -> Result<u64, StorageError> {
        self.db.with_reader(|conn| hooks::count_by_method(conn, method))
    }

    pub fn stats(&self) -> Result<HookStats, StorageError> {
        self.db.with_reader(|conn| {
            Ok(HookStats {
                total: hooks::count_all(conn)?,
                by_type: hooks::counts_by_type(conn)?,
                by_source: hooks::counts_by_source(conn)?,
                last_scan: options::last_scan(conn)?,
            })
        })
    }

    pub fn last_scan(&self) -> Result<i64, StorageError> {
        self.db.with_reader(options::last_scan)
    }

    /// Markdown catalogue of every stored record.
    pub fn docs_markdown(&self, generated_at: DateTime<Utc>) -> Result<String, StorageError> {
        let rows = self.db.with_reader(hooks::all_by_name)?;
        Ok(render_markdown(&rows, generated_at))
    }

    /// Drop runtime records older than `expiry_days`. Never called by the
    /// write path itself.
    pub fn purge_expired_runtime(
        &self,
        expiry_days: u32,
        now: i64,
    ) -> Result<RetentionReport, StorageError> {
        self.db
            .with_writer(|conn| retention::purge_expired_runtime(conn, expiry_days, now))
    }

    fn replace_in_transaction(
        &self,
        records: &[HookRecord],
        now: i64,
    ) -> Result<usize, StorageError> {
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                let removed = hooks::delete_by_method(tx, DetectionMethod::Static)?;
                let generation = options::static_generation(tx)? + 1;
                options::set_static_generation(tx, generation)?;
                let dropped = write_queue::delete_before_generation(tx, generation)?;
                tracing::debug!(removed, dropped_chunks = dropped, generation, "static records cleared");

                if records.is_empty() {
                    return Ok(0);
                }

                let (head, tail) = records.split_at(records.len().min(CHUNK_SIZE));
                insert_batch(tx, head, now);

                let mut queued = 0;
                for chunk in tail.chunks(CHUNK_SIZE) {
                    let stamped: Vec<HookRecord> = chunk.iter().map(|r| stamp(r, now)).collect();
                    let payload = serde_json::to_string(&stamped).map_err(|e| {
                        StorageError::PayloadError {
                            message: e.to_string(),
                        }
                    })?;
                    write_queue::enqueue_chunk(tx, generation, &payload, chunk.len(), now)?;
                    queued += 1;
                }
                Ok(queued)
            })
        })
    }

    /// Schedule a drain tick at `due_at` unless one is already pending.
    fn ensure_drain_scheduled(&self, due_at: i64) -> bool {
        if self.scheduler.is_pending(DRAIN_TASK) {
            return false;
        }
        self.scheduler.schedule_once(DRAIN_TASK, due_at);
        true
    }

    fn report_error(&self, context: &str, error: &StorageError) {
        tracing::error!(error = %error, "{context}");
        self.events.emit_error(&ErrorEvent {
            message: format!("{context}: {error}"),
            error_code: error.error_code().to_string(),
        });
    }
}

/// One drain tick inside an open transaction. `None` when the queue is empty.
fn drain_in(conn: &rusqlite::Connection, now: i64) -> Result<Option<DrainOutcome>, StorageError> {
    let Some(chunk) = write_queue::pop_oldest(conn)? else {
        return Ok(None);
    };
    let generation = options::static_generation(conn)?;
    let mut outcome = DrainOutcome {
        chunk_id: Some(chunk.id),
        ..DrainOutcome::default()
    };

    if chunk.generation != generation {
        outcome.stale = true;
        tracing::debug!(
            chunk_id = chunk.id,
            chunk_generation = chunk.generation,
            generation,
            "discarding chunk from a superseded scan"
        );
    } else {
        match serde_json::from_str::<Vec<HookRecord>>(&chunk.payload) {
            Ok(records) => {
                let batch = insert_batch(conn, &records, now);
                outcome.inserted = batch.inserted;
                outcome.failed = batch.failed;
            }
            Err(e) => {
                tracing::warn!(chunk_id = chunk.id, error = %e, "unreadable queue payload dropped");
                outcome.failed = chunk.record_count;
            }
        }
    }

    outcome.remaining_chunks = write_queue::queue_len(conn)?;
    Ok(Some(outcome))
}

fn stamp(record: &HookRecord, now: i64) -> HookRecord {
    let mut record = record.clone();
    record.first_seen.get_or_insert(now);
    record.last_seen.get_or_insert(now);
    record
}

impl StaticReplace for HookCache {
    fn replace_static_entries(&self, records: Vec<HookRecord>) -> usize {
        let total = records.len();
        let now = unix_now();
        match self.replace_in_transaction(&records, now) {
            Ok(queued) => {
                if queued > 0 {
                    self.ensure_drain_scheduled(now);
                }
                tracing::info!(
                    total,
                    synchronous = total.min(CHUNK_SIZE),
                    queued_chunks = queued,
                    "static records replaced"
                );
                total
            }
            Err(e) => {
                self.report_error("static replace failed", &e);
                0
            }
        }
    }

    fn record_last_scan(&self, at: i64) {
        if let Err(e) = self.db.with_writer(|conn| options::set_last_scan(conn, at)) {
            self.report_error("failed to record scan time", &e);
        }
    }
}

impl RecordSink for HookCache {
    fn insert_record(&self, record: &HookRecord) -> Result<(), StorageError> {
        let now = unix_now();
        self.db
            .with_writer(|conn| hooks::insert(conn, record, now))
            .map(|_| ())
    }
}
