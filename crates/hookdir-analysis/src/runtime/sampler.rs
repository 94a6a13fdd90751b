//! RuntimeSampler — records sampled hook dispatches with their call site.

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use hookdir_core::config::{ScanConfiguration, SiteLayout};
use hookdir_core::constants::{ALL_HOOK, MAX_STACK_FRAMES, NOISY_HOOKS, SAMPLER_PRIORITY};
use hookdir_core::traits::RecordSink;
use hookdir_core::types::FxHashSet;
use hookdir_core::HookRecord;

use super::bus::{HookBus, HookListener};
use super::sampling::{RandomSource, SamplePolicy};
use super::stack::StackProbe;
use crate::classifier::paths::{normalize, relative_path};
use crate::classifier::SourceClassifier;

/// What `on_event` did with one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    Disabled,
    /// Raised while the sampler was already handling an event.
    Reentrant,
    /// `all`, `query`, or a configured ignored hook.
    Ignored,
    NotSampled,
    Captured,
    /// Sampled, but the store rejected the record.
    PersistFailed,
}

/// Samples live dispatches and persists one runtime record per capture.
pub struct RuntimeSampler {
    enabled: bool,
    policy: SamplePolicy,
    in_handler: Cell<bool>,
    ignored: FxHashSet<String>,
    classifier: SourceClassifier,
    base: PathBuf,
    dispatcher_files: Vec<String>,
    stack: Rc<dyn StackProbe>,
    sink: Arc<dyn RecordSink>,
    rng: RefCell<Box<dyn RandomSource>>,
}

impl RuntimeSampler {
    pub fn new(
        settings: &ScanConfiguration,
        layout: &SiteLayout,
        stack: Rc<dyn StackProbe>,
        sink: Arc<dyn RecordSink>,
    ) -> Self {
        let mut ignored: FxHashSet<String> = FxHashSet::default();
        ignored.insert(ALL_HOOK.to_string());
        ignored.extend(NOISY_HOOKS.iter().map(|h| h.to_string()));

        Self {
            enabled: settings.runtime_capture,
            policy: SamplePolicy::new(settings.capture_sample),
            in_handler: Cell::new(false),
            ignored,
            classifier: SourceClassifier::from_layout(layout),
            base: layout.base.clone(),
            dispatcher_files: layout.dispatcher_files.iter().map(|f| normalize(f)).collect(),
            stack,
            sink,
            rng: RefCell::new(Box::new(StdRng::from_entropy())),
        }
    }

    /// Replace the random source.
    pub fn with_rng(self, rng: impl RandomSource + 'static) -> Self {
        Self {
            rng: RefCell::new(Box::new(rng)),
            ..self
        }
    }

    /// Never sample these hook names, in addition to the built-in ones.
    pub fn with_ignored_hooks<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn policy(&self) -> SamplePolicy {
        self.policy
    }

    /// Register on every hook at the lowest priority tier. A disabled
    /// sampler registers nothing. Returns whether it registered.
    pub fn start(self: &Rc<Self>, bus: &dyn HookBus) -> bool {
        if !self.enabled {
            return false;
        }
        bus.listen_all(SAMPLER_PRIORITY, Rc::clone(self) as Rc<dyn HookListener>);
        tracing::debug!(every = self.policy.every(), "runtime sampler listening");
        true
    }

    pub fn on_event(&self, hook_name: &str) -> SampleOutcome {
        if !self.enabled {
            return SampleOutcome::Disabled;
        }
        if self.in_handler.get() {
            return SampleOutcome::Reentrant;
        }
        if self.ignored.contains(hook_name) {
            return SampleOutcome::Ignored;
        }
        let sampled = {
            let mut rng = self.rng.borrow_mut();
            self.policy.should_capture(&mut **rng)
        };
        if !sampled {
            return SampleOutcome::NotSampled;
        }

        let _guard = HandlerGuard::enter(&self.in_handler);
        let record = self.attribute(HookRecord::runtime_event(hook_name));
        match self.sink.insert_record(&record) {
            Ok(()) => SampleOutcome::Captured,
            Err(e) => {
                tracing::warn!(hook = hook_name, error = %e, "failed to persist runtime hook");
                SampleOutcome::PersistFailed
            }
        }
    }

    /// Fill in file, line and source from the first frame outside the
    /// dispatch machinery.
    fn attribute(&self, record: HookRecord) -> HookRecord {
        let frames = self.stack.frames(MAX_STACK_FRAMES);
        let site = frames.into_iter().find_map(|frame| {
            let file = frame.file?;
            let normalized = normalize(&file);
            if normalized.is_empty() || self.dispatcher_files.contains(&normalized) {
                return None;
            }
            Some((file, normalized, frame.line))
        });

        let Some((file, normalized, line)) = site else {
            return record;
        };
        let (source_type, source_name) = self.classifier.classify_normalized(&normalized);
        let mut record = record
            .with_file(relative_path(&file, &self.base))
            .with_source(source_type, source_name);
        record.line = line;
        record
    }
}

impl HookListener for RuntimeSampler {
    fn on_hook(&self, hook_name: &str) {
        let _ = self.on_event(hook_name);
    }
}

/// Holds the reentrancy flag for one capture, clearing it on every exit
/// path including unwinding.
struct HandlerGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> HandlerGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for HandlerGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}
