//! V002: durable write queue and one-shot task schedule.

pub const MIGRATION_SQL: &str = r#"
-- Pending chunks of static records, drained oldest first. `generation`
-- ties a chunk to the scan that produced it.
CREATE TABLE IF NOT EXISTS write_queue (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    generation INTEGER NOT NULL,
    payload TEXT NOT NULL,
    record_count INTEGER NOT NULL,
    enqueued_at INTEGER NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_write_queue_generation
    ON write_queue(generation);

-- At most one pending occurrence per task name.
CREATE TABLE IF NOT EXISTS scheduled_tasks (
    task TEXT PRIMARY KEY,
    due_at INTEGER NOT NULL
) STRICT;
"#;
