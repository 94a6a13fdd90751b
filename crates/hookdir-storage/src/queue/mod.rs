//! Persistence/Queue Manager: the write path for hook records.

pub mod batch;
pub mod manager;

pub use batch::insert_batch;
pub use manager::HookCache;
