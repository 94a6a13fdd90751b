//! Write path: synchronous first batch, chunked queue, drain ticks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use hookdir_core::constants::{DRAIN_RESCHEDULE_DELAY_SECS, DRAIN_TASK, HOOK_NAME_MAX_LEN};
use hookdir_core::events::types::{ChunkDrainedEvent, ErrorEvent};
use hookdir_core::events::{EventDispatcher, HookDirEventHandler};
use hookdir_core::time::unix_now;
use hookdir_core::traits::{RecordSink, StaticReplace, TaskScheduler};
use hookdir_core::{DetectionMethod, HookRecord, HookType, SourceType};
use hookdir_storage::queries::{options, queue};
use hookdir_storage::{DatabaseManager, HookCache, HookFilter, SqliteScheduler};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    db: Arc<DatabaseManager>,
    scheduler: Arc<SqliteScheduler>,
    cache: HookCache,
}

fn fixture() -> Fixture {
    fixture_with_events(EventDispatcher::new())
}

fn fixture_with_events(events: EventDispatcher) -> Fixture {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(DatabaseManager::open(&dir.path().join("hooks.db")).unwrap());
    let scheduler = Arc::new(SqliteScheduler::new(Arc::clone(&db)));
    let cache = HookCache::new(Arc::clone(&db), scheduler.clone()).with_events(events);
    Fixture {
        _dir: dir,
        db,
        scheduler,
        cache,
    }
}

fn static_records(n: usize) -> Vec<HookRecord> {
    (0..n)
        .map(|i| {
            HookRecord::static_call(format!("hook_{i:05}"), HookType::Action, i as u32 + 1)
                .with_file("wp-content/plugins/foo/foo.php")
                .with_source(SourceType::Plugin, "foo")
        })
        .collect()
}

fn stored_names(cache: &HookCache) -> Vec<String> {
    let filter = HookFilter {
        limit: u32::MAX,
        ..HookFilter::default()
    };
    let (_, rows) = cache.list(&filter).unwrap();
    rows.into_iter().map(|r| r.record.hook_name).collect()
}

#[test]
fn small_replace_is_fully_synchronous() {
    let f = fixture();
    assert_eq!(f.cache.replace_static_entries(static_records(10)), 10);
    assert_eq!(f.cache.count(DetectionMethod::Static).unwrap(), 10);
    assert_eq!(f.cache.queue_len().unwrap(), 0);
    assert!(!f.scheduler.is_pending(DRAIN_TASK));
}

#[test]
fn exactly_one_chunk_needs_no_queue() {
    let f = fixture();
    assert_eq!(f.cache.replace_static_entries(static_records(500)), 500);
    assert_eq!(f.cache.count(DetectionMethod::Static).unwrap(), 500);
    assert_eq!(f.cache.queue_len().unwrap(), 0);
    assert!(!f.scheduler.is_pending(DRAIN_TASK));
}

#[test]
fn large_replace_drains_over_two_ticks() {
    let f = fixture();
    let records = static_records(1200);

    assert_eq!(f.cache.replace_static_entries(records.clone()), 1200);
    assert_eq!(f.cache.count(DetectionMethod::Static).unwrap(), 500);
    assert_eq!(f.cache.queue_len().unwrap(), 2);

    let first_due = f.scheduler.next_due(DRAIN_TASK).unwrap().expect("drain scheduled");
    let now = unix_now().max(first_due);

    // Tick 1.
    assert!(f.scheduler.take_due(DRAIN_TASK, now).unwrap());
    let tick = f.cache.drain_one_chunk(now).unwrap();
    assert_eq!(tick.inserted, 500);
    assert_eq!(tick.failed, 0);
    assert_eq!(tick.remaining_chunks, 1);
    assert!(tick.rescheduled);
    assert_eq!(f.cache.count(DetectionMethod::Static).unwrap(), 1000);
    assert_eq!(
        f.scheduler.next_due(DRAIN_TASK).unwrap(),
        Some(now + DRAIN_RESCHEDULE_DELAY_SECS)
    );
    assert!(!f.scheduler.take_due(DRAIN_TASK, now).unwrap(), "next tick is not due yet");

    // Tick 2.
    let later = now + DRAIN_RESCHEDULE_DELAY_SECS;
    assert!(f.scheduler.take_due(DRAIN_TASK, later).unwrap());
    let tick = f.cache.drain_one_chunk(later).unwrap();
    assert_eq!(tick.inserted, 200);
    assert_eq!(tick.remaining_chunks, 0);
    assert!(!tick.rescheduled);
    assert!(!f.scheduler.is_pending(DRAIN_TASK));

    let mut expected: Vec<String> = records.into_iter().map(|r| r.hook_name).collect();
    expected.sort();
    assert_eq!(stored_names(&f.cache), expected);
}

#[test]
fn repeated_replace_keeps_a_single_pending_tick() {
    let f = fixture();
    f.cache.replace_static_entries(static_records(1200));
    let due = f.scheduler.next_due(DRAIN_TASK).unwrap();
    f.cache.replace_static_entries(static_records(1200));

    assert_eq!(f.scheduler.next_due(DRAIN_TASK).unwrap(), due);
    // Chunks from the first replace were superseded.
    assert_eq!(f.cache.queue_len().unwrap(), 2);
    assert_eq!(f.cache.count(DetectionMethod::Static).unwrap(), 500);
}

#[test]
fn rescan_drops_chunks_of_previous_scan() {
    let f = fixture();
    f.cache.replace_static_entries(static_records(1200));
    assert_eq!(f.cache.replace_static_entries(static_records(3)), 3);

    assert_eq!(f.cache.queue_len().unwrap(), 0);
    let tick = f.cache.drain_one_chunk(unix_now()).unwrap();
    assert_eq!(tick.chunk_id, None);
    assert_eq!(f.cache.count(DetectionMethod::Static).unwrap(), 3);
}

#[test]
fn stale_chunk_is_discarded() {
    let f = fixture();
    f.cache.replace_static_entries(static_records(1200));
    f.db.with_writer(|conn| options::set_static_generation(conn, 99))
        .unwrap();

    let tick = f.cache.drain_one_chunk(unix_now()).unwrap();
    assert!(tick.stale);
    assert_eq!(tick.inserted, 0);
    assert_eq!(tick.remaining_chunks, 1);
    assert_eq!(f.cache.count(DetectionMethod::Static).unwrap(), 500);
}

#[test]
fn unreadable_payload_counts_as_failed() {
    let f = fixture();
    let generation = f.db.with_reader(options::static_generation).unwrap();
    f.db.with_writer(|conn| queue::enqueue_chunk(conn, generation, "not json", 7, 0))
        .unwrap();

    let tick = f.cache.drain_one_chunk(unix_now()).unwrap();
    assert_eq!(tick.failed, 7);
    assert_eq!(tick.inserted, 0);
    assert_eq!(f.cache.queue_len().unwrap(), 0);
}

#[test]
fn empty_replace_clears_static_but_keeps_runtime() {
    let f = fixture();
    f.cache.replace_static_entries(static_records(4));
    f.cache
        .insert_record(&HookRecord::runtime_event("init"))
        .unwrap();

    assert_eq!(f.cache.replace_static_entries(Vec::new()), 0);
    assert_eq!(f.cache.count(DetectionMethod::Static).unwrap(), 0);
    assert_eq!(f.cache.count(DetectionMethod::Runtime).unwrap(), 1);
}

#[test]
fn oversize_name_fails_alone() {
    let f = fixture();
    let mut records = static_records(4);
    records[1].hook_name = "x".repeat(HOOK_NAME_MAX_LEN + 1);
    records[2].hook_name = "y".repeat(HOOK_NAME_MAX_LEN);

    let outcome = f.cache.insert_batch(&records);
    assert_eq!(outcome.inserted, 3);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.attempted(), 4);

    // The replace still reports every record it was handed.
    assert_eq!(f.cache.replace_static_entries(records), 4);
    assert_eq!(f.cache.count(DetectionMethod::Static).unwrap(), 3);
}

#[test]
fn failures_in_queued_chunk_are_counted() {
    let f = fixture();
    let mut records = static_records(600);
    records[550].hook_name = String::new();
    records[551].hook_name = "y".repeat(300);

    f.cache.replace_static_entries(records);
    let tick = f.cache.drain_one_chunk(unix_now()).unwrap();
    assert_eq!(tick.inserted, 98);
    assert_eq!(tick.failed, 2);
    assert_eq!(f.cache.count(DetectionMethod::Static).unwrap(), 598);
}

#[test]
fn insert_record_fills_timestamps() {
    let f = fixture();
    let before = unix_now();
    f.cache
        .insert_record(&HookRecord::runtime_event("wp_loaded"))
        .unwrap();

    let (_, rows) = f
        .cache
        .list(&HookFilter {
            limit: 10,
            ..HookFilter::default()
        })
        .unwrap();
    let record = &rows[0].record;
    assert_eq!(record.detection_method, DetectionMethod::Runtime);
    assert_eq!(record.hook_type, HookType::Unknown);
    assert!(record.first_seen.unwrap() >= before);
    assert_eq!(record.first_seen, record.last_seen);
}

#[test]
fn last_scan_is_recorded() {
    let f = fixture();
    assert_eq!(f.cache.last_scan().unwrap(), 0);
    f.cache.record_last_scan(1_700_000_000);
    assert_eq!(f.cache.last_scan().unwrap(), 1_700_000_000);
}

#[derive(Default)]
struct Recorder {
    drained: AtomicUsize,
    errors: Mutex<Vec<String>>,
}

impl HookDirEventHandler for Recorder {
    fn on_chunk_drained(&self, _event: &ChunkDrainedEvent) {
        self.drained.fetch_add(1, Ordering::Relaxed);
    }

    fn on_error(&self, event: &ErrorEvent) {
        self.errors.lock().unwrap().push(event.error_code.clone());
    }
}

#[test]
fn drain_emits_chunk_events() {
    let recorder = Arc::new(Recorder::default());
    let mut events = EventDispatcher::new();
    events.register(recorder.clone());
    let f = fixture_with_events(events);

    f.cache.replace_static_entries(static_records(1600));
    let now = unix_now();
    while f.cache.queue_len().unwrap() > 0 {
        f.cache.drain_one_chunk(now).unwrap();
    }

    assert_eq!(recorder.drained.load(Ordering::Relaxed), 3);
    assert!(recorder.errors.lock().unwrap().is_empty());
    assert_eq!(f.cache.count(DetectionMethod::Static).unwrap(), 1600);
}
