//! Runtime sampler: attribution, reentrancy, and sampling policy.

use std::path::Path;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use hookdir_analysis::runtime::{
    HookListener, LocalHookBus, RuntimeSampler, SampleOutcome, SamplePolicy, ShadowStack,
    StackFrame,
};
use hookdir_core::errors::StorageError;
use hookdir_core::traits::RecordSink;
use hookdir_core::{DetectionMethod, HookRecord, HookType, ScanConfiguration, SiteLayout, SourceType};

const SITE: &str = "/srv/site";
const DISPATCHER: &str = "/srv/site/wp-includes/plugin.php";

#[derive(Default)]
struct MemorySink {
    records: Mutex<Vec<HookRecord>>,
}

impl RecordSink for MemorySink {
    fn insert_record(&self, record: &HookRecord) -> Result<(), StorageError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

struct FailingSink;

impl RecordSink for FailingSink {
    fn insert_record(&self, _record: &HookRecord) -> Result<(), StorageError> {
        Err(StorageError::SqliteError {
            message: "disk I/O error".into(),
        })
    }
}

/// Dispatches the same hook again from inside the insert.
struct ReentrantSink {
    bus: Mutex<Option<Rc<LocalHookBus>>>,
    inner: MemorySink,
    nested_calls: Mutex<usize>,
}

impl RecordSink for ReentrantSink {
    fn insert_record(&self, record: &HookRecord) -> Result<(), StorageError> {
        *self.nested_calls.lock().unwrap() += 1;
        let bus = self.bus.lock().unwrap().clone();
        if let Some(bus) = bus {
            bus.dispatch(&record.hook_name);
        }
        self.inner.insert_record(record)
    }
}

/// An RNG whose fallible path always fails.
struct BrokenRng;

impl RngCore for BrokenRng {
    fn next_u32(&mut self) -> u32 {
        0
    }
    fn next_u64(&mut self) -> u64 {
        0
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }
    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
        Err(rand::Error::new("entropy source unavailable"))
    }
}

fn capture_every(every: u32) -> ScanConfiguration {
    ScanConfiguration {
        runtime_capture: true,
        capture_sample: every,
        ..Default::default()
    }
}

fn layout() -> SiteLayout {
    SiteLayout::rooted_at(Path::new(SITE))
}

#[test]
fn test_disabled_sampler_never_registers() {
    let stack = Rc::new(ShadowStack::new());
    let bus = LocalHookBus::new(stack.clone(), DISPATCHER);
    let sink = Arc::new(MemorySink::default());
    let sampler = Rc::new(RuntimeSampler::new(
        &ScanConfiguration::default(),
        &layout(),
        stack,
        sink.clone(),
    ));

    assert!(!sampler.start(&bus));
    assert_eq!(bus.listener_count("all"), 0);
    assert_eq!(sampler.on_event("init"), SampleOutcome::Disabled);
    assert!(sink.records.lock().unwrap().is_empty());
}

#[test]
fn test_attribution_skips_dispatcher_frames() {
    let stack = Rc::new(ShadowStack::new());
    let bus = LocalHookBus::new(stack.clone(), DISPATCHER);
    let sink = Arc::new(MemorySink::default());
    let sampler = Rc::new(RuntimeSampler::new(&capture_every(0), &layout(), stack.clone(), sink.clone()));
    assert!(sampler.start(&bus));

    {
        let _caller = stack.enter(StackFrame::new("/srv/site/wp-content/plugins/foo/bar.php", 42));
        let _native = stack.enter(StackFrame::default());
        bus.dispatch("foo_ready");
    }

    let records = sink.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    let r = &records[0];
    assert_eq!(r.hook_name, "foo_ready");
    assert_eq!(r.hook_type, HookType::Unknown);
    assert_eq!(r.detection_method, DetectionMethod::Runtime);
    assert_eq!(r.file_path.as_deref(), Some("wp-content/plugins/foo/bar.php"));
    assert_eq!(r.line, Some(42));
    assert_eq!(r.source_type, SourceType::Plugin);
    assert_eq!(r.source_name, "foo");
}

#[test]
fn test_relative_site_root_matches_absolute_frames() {
    let cwd = std::env::current_dir().unwrap();
    let layout = SiteLayout::rooted_at(Path::new("."));
    let stack = Rc::new(ShadowStack::new());
    let bus = LocalHookBus::new(stack.clone(), cwd.join("wp-includes/plugin.php"));
    let sink = Arc::new(MemorySink::default());
    let sampler = Rc::new(RuntimeSampler::new(&capture_every(1), &layout, stack.clone(), sink.clone()));
    assert!(sampler.start(&bus));

    {
        let _caller = stack.enter(StackFrame::new(cwd.join("wp-content/plugins/foo/foo.php"), 3));
        bus.dispatch("foo_loaded");
    }

    let records = sink.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].file_path.as_deref(), Some("wp-content/plugins/foo/foo.php"));
    assert_eq!(records[0].line, Some(3));
    assert_eq!(records[0].source_type, SourceType::Plugin);
    assert_eq!(records[0].source_name, "foo");
}

#[test]
fn test_no_frame_outside_dispatcher_leaves_site_empty() {
    let stack = Rc::new(ShadowStack::new());
    let bus = LocalHookBus::new(stack.clone(), DISPATCHER);
    let sink = Arc::new(MemorySink::default());
    let sampler = Rc::new(RuntimeSampler::new(&capture_every(1), &layout(), stack, sink.clone()));
    sampler.start(&bus);

    bus.dispatch("shutdown");

    let records = sink.records.lock().unwrap();
    assert_eq!(records[0].file_path, None);
    assert_eq!(records[0].line, None);
    assert_eq!(records[0].source_type, SourceType::Unknown);
    assert_eq!(records[0].source_name, "");
}

#[test]
fn test_internal_hooks_are_ignored() {
    let stack = Rc::new(ShadowStack::new());
    let sink = Arc::new(MemorySink::default());
    let sampler = RuntimeSampler::new(&capture_every(0), &layout(), stack, sink.clone())
        .with_ignored_hooks(["gettext"]);

    assert_eq!(sampler.on_event("all"), SampleOutcome::Ignored);
    assert_eq!(sampler.on_event("query"), SampleOutcome::Ignored);
    assert_eq!(sampler.on_event("gettext"), SampleOutcome::Ignored);
    assert_eq!(sampler.on_event("init"), SampleOutcome::Captured);
    assert_eq!(sink.records.lock().unwrap().len(), 1);
}

#[test]
fn test_nested_dispatch_from_persistence_adds_nothing() {
    let stack = Rc::new(ShadowStack::new());
    let bus = Rc::new(LocalHookBus::new(stack.clone(), DISPATCHER));
    let sink = Arc::new(ReentrantSink {
        bus: Mutex::new(Some(bus.clone())),
        inner: MemorySink::default(),
        nested_calls: Mutex::new(0),
    });
    let sampler = Rc::new(RuntimeSampler::new(&capture_every(0), &layout(), stack, sink.clone()));
    assert!(sampler.start(bus.as_ref()));

    bus.dispatch("save_post");
    bus.dispatch("save_post");

    assert_eq!(*sink.nested_calls.lock().unwrap(), 2);
    assert_eq!(sink.inner.records.lock().unwrap().len(), 2);

    // Break the bus <-> sink cycle.
    sink.bus.lock().unwrap().take();
}

#[test]
fn test_persist_failure_releases_reentrancy_flag() {
    let stack = Rc::new(ShadowStack::new());
    let sampler = RuntimeSampler::new(&capture_every(0), &layout(), stack, Arc::new(FailingSink));

    assert_eq!(sampler.on_event("init"), SampleOutcome::PersistFailed);
    // A stuck flag would report Reentrant here.
    assert_eq!(sampler.on_event("init"), SampleOutcome::PersistFailed);
}

#[test]
fn test_listener_panic_releases_reentrancy_flag() {
    struct PanickingSink;
    impl RecordSink for PanickingSink {
        fn insert_record(&self, _record: &HookRecord) -> Result<(), StorageError> {
            panic!("storage exploded");
        }
    }

    let stack = Rc::new(ShadowStack::new());
    let sampler = RuntimeSampler::new(&capture_every(0), &layout(), stack, Arc::new(PanickingSink));
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sampler.on_event("init")));
    assert!(result.is_err());

    let sampler = sampler.with_ignored_hooks(["init"]);
    assert_eq!(sampler.on_event("init"), SampleOutcome::Ignored);
}

#[test]
fn test_sample_zero_and_one_capture_everything() {
    for every in [0, 1] {
        let sink = Arc::new(MemorySink::default());
        let sampler = RuntimeSampler::new(
            &capture_every(every),
            &layout(),
            Rc::new(ShadowStack::new()),
            sink.clone(),
        )
        .with_rng(StdRng::seed_from_u64(7));
        for _ in 0..1_000 {
            sampler.on_event("tick");
        }
        assert_eq!(sink.records.lock().unwrap().len(), 1_000);
    }
}

#[test]
fn test_one_in_a_hundred_is_roughly_one_percent() {
    let sink = Arc::new(MemorySink::default());
    let sampler = RuntimeSampler::new(
        &capture_every(100),
        &layout(),
        Rc::new(ShadowStack::new()),
        sink.clone(),
    )
    .with_rng(StdRng::seed_from_u64(0x5eed));

    let trials = 100_000;
    for _ in 0..trials {
        sampler.on_event("tick");
    }
    let captured = sink.records.lock().unwrap().len();
    // Expected 1000, standard deviation ~31.
    assert!((850..=1150).contains(&captured), "captured {captured}");
}

#[test]
fn test_failed_random_draw_captures() {
    let sink = Arc::new(MemorySink::default());
    let sampler = RuntimeSampler::new(
        &capture_every(1_000_000),
        &layout(),
        Rc::new(ShadowStack::new()),
        sink.clone(),
    )
    .with_rng(BrokenRng);

    assert_eq!(sampler.on_event("init"), SampleOutcome::Captured);
    assert!(SamplePolicy::new(50).should_capture(&mut BrokenRng));
}

#[test]
fn test_sampler_is_a_plain_listener() {
    let sink = Arc::new(MemorySink::default());
    let sampler = RuntimeSampler::new(&capture_every(0), &layout(), Rc::new(ShadowStack::new()), sink.clone());
    sampler.on_hook("direct");
    assert_eq!(sink.records.lock().unwrap()[0].hook_name, "direct");
}
