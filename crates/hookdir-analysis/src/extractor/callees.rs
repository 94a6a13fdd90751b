//! Table of registration functions and the hook type each dispatches.

use hookdir_core::config::ScanConfig;
use hookdir_core::constants::{DEFAULT_ACTION_CALLEES, DEFAULT_FILTER_CALLEES};
use hookdir_core::types::FxHashMap;
use hookdir_core::HookType;

/// Maps callee identifiers to the hook type they register.
#[derive(Debug, Clone)]
pub struct CalleeTable {
    entries: FxHashMap<String, HookType>,
}

impl CalleeTable {
    pub fn new<A, F>(actions: A, filters: F) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        let mut entries = FxHashMap::default();
        for name in actions {
            entries.insert(name.into(), HookType::Action);
        }
        for name in filters {
            entries.insert(name.into(), HookType::Filter);
        }
        Self { entries }
    }

    /// Callees from the `[scan]` config section.
    pub fn from_config(scan: &ScanConfig) -> Self {
        Self::new(scan.effective_action_callees(), scan.effective_filter_callees())
    }

    pub fn lookup(&self, identifier: &str) -> Option<HookType> {
        self.entries.get(identifier).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CalleeTable {
    fn default() -> Self {
        Self::new(DEFAULT_ACTION_CALLEES, DEFAULT_FILTER_CALLEES)
    }
}
