//! Deferred-task scheduling.

/// A one-shot task scheduler keyed by task name.
///
/// At most one pending occurrence per name is expected; callers check
/// `is_pending` before scheduling.
pub trait TaskScheduler: Send + Sync {
    /// Whether an occurrence of `task` is already scheduled.
    fn is_pending(&self, task: &str) -> bool;

    /// Schedule `task` to run once at `due_at` (unix seconds).
    fn schedule_once(&self, task: &str, due_at: i64);
}
