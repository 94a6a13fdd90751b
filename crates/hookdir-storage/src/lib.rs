//! SQLite persistence for the hook directory.
//!
//! `DatabaseManager` owns the connections; `HookCache` is the write path
//! (synchronous first batch plus a durable chunk queue) and the read side
//! used by listings, stats and the docs export.

pub mod connection;
pub mod docs;
pub mod migrations;
pub mod queries;
pub mod queue;
pub mod retention;
pub mod scheduler;
pub mod types;

pub use connection::DatabaseManager;
pub use queue::HookCache;
pub use retention::RetentionReport;
pub use scheduler::SqliteScheduler;
pub use types::{BatchOutcome, DrainOutcome, HookFilter, HookRow, HookStats};
