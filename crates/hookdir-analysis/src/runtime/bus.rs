//! Hook dispatch seam and an in-process implementation.

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use hookdir_core::constants::ALL_HOOK;
use hookdir_core::types::FxHashMap;

use super::stack::{ShadowStack, StackFrame};

/// Receives the name of every hook it is registered for.
pub trait HookListener {
    fn on_hook(&self, hook_name: &str);
}

/// Where the sampler registers itself.
pub trait HookBus {
    /// Register `listener` for every dispatched hook. Lower priorities run
    /// first.
    fn listen_all(&self, priority: i32, listener: Rc<dyn HookListener>);
}

struct Registration {
    priority: i32,
    seq: u64,
    listener: Rc<dyn HookListener>,
}

/// Single-threaded hook dispatcher.
///
/// `dispatch` runs the `all` listeners first, then the hook's own, each in
/// ascending priority and then registration order. Listener lists are
/// snapshotted before running, so a listener may dispatch (or register)
/// re-entrantly. While dispatching, a frame for `dispatcher_file` sits on
/// the shadow stack, as the host's dispatch machinery would.
pub struct LocalHookBus {
    listeners: RefCell<FxHashMap<String, Vec<Registration>>>,
    next_seq: Cell<u64>,
    stack: Rc<ShadowStack>,
    dispatcher_file: PathBuf,
}

impl LocalHookBus {
    pub fn new(stack: Rc<ShadowStack>, dispatcher_file: impl Into<PathBuf>) -> Self {
        Self {
            listeners: RefCell::new(FxHashMap::default()),
            next_seq: Cell::new(0),
            stack,
            dispatcher_file: dispatcher_file.into(),
        }
    }

    pub fn stack(&self) -> &Rc<ShadowStack> {
        &self.stack
    }

    pub fn add_listener(&self, hook_name: &str, priority: i32, listener: Rc<dyn HookListener>) {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        let mut listeners = self.listeners.borrow_mut();
        let list = listeners.entry(hook_name.to_string()).or_default();
        list.push(Registration {
            priority,
            seq,
            listener,
        });
        list.sort_by_key(|r| (r.priority, r.seq));
    }

    pub fn listener_count(&self, hook_name: &str) -> usize {
        self.listeners
            .borrow()
            .get(hook_name)
            .map_or(0, |list| list.len())
    }

    /// Dispatch `hook_name` to the `all` listeners and then its own.
    pub fn dispatch(&self, hook_name: &str) {
        let mut batch = self.snapshot(ALL_HOOK);
        if hook_name != ALL_HOOK {
            batch.extend(self.snapshot(hook_name));
        }
        if batch.is_empty() {
            return;
        }
        let _frame = self.stack.enter(StackFrame {
            file: Some(self.dispatcher_file.clone()),
            line: None,
        });
        for listener in batch {
            listener.on_hook(hook_name);
        }
    }

    fn snapshot(&self, hook_name: &str) -> Vec<Rc<dyn HookListener>> {
        self.listeners
            .borrow()
            .get(hook_name)
            .map(|list| list.iter().map(|r| Rc::clone(&r.listener)).collect())
            .unwrap_or_default()
    }
}

impl HookBus for LocalHookBus {
    fn listen_all(&self, priority: i32, listener: Rc<dyn HookListener>) {
        self.add_listener(ALL_HOOK, priority, listener);
    }
}
