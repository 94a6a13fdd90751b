//! Host-facing facade over the hook directory.
//!
//! [`HookDirectory`] wires configuration, storage, the static scanner and the
//! runtime sampler together and exposes the operations a surrounding API or
//! UI layer calls: `scan`, `list`, `stats`, `docs_markdown`, and the
//! `run_due_tasks` tick that drains the write queue.

pub mod query;
pub mod runtime;

pub use query::{HookPage, ListQuery};
pub use runtime::{get, initialize, DirectoryOptions, HookDirectory};
