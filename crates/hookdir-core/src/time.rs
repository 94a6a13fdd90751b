//! Wall-clock helpers. All persisted timestamps are unix seconds (UTC).

use chrono::Utc;

/// Current time as unix seconds.
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}
