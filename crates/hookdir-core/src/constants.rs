//! Shared constants for the hook directory.

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ---- Write path ----

/// Maximum records per synchronous batch and per queued chunk.
pub const CHUNK_SIZE: usize = 500;

/// Delay before the next drain tick while chunks remain, in seconds.
pub const DRAIN_RESCHEDULE_DELAY_SECS: i64 = 15;

/// Task name the queue drain is scheduled under.
pub const DRAIN_TASK: &str = "hookdir_process_queue";

/// Individual insert failures logged per batch before only the summary is logged.
pub const MAX_LOGGED_INSERT_FAILURES: usize = 3;

/// Maximum stored length of a hook name.
pub const HOOK_NAME_MAX_LEN: usize = 191;

// ---- Static scan ----

/// Source extensions scanned by default.
pub const DEFAULT_EXTENSIONS: [&str; 1] = ["php"];

/// Default action registration callees.
pub const DEFAULT_ACTION_CALLEES: [&str; 2] = ["do_action", "do_action_ref_array"];

/// Default filter registration callees.
pub const DEFAULT_FILTER_CALLEES: [&str; 2] = ["apply_filters", "apply_filters_ref_array"];

// ---- Runtime capture ----

/// Hook every dispatch is forwarded to; the sampler listens here.
pub const ALL_HOOK: &str = "all";

/// High-frequency internal hooks never sampled.
pub const NOISY_HOOKS: [&str; 1] = ["query"];

/// Priority the sampler registers at (lowest number runs first).
pub const SAMPLER_PRIORITY: i32 = 1;

/// Stack frames inspected when attributing a runtime event.
pub const MAX_STACK_FRAMES: usize = 10;

// ---- Settings defaults ----

pub const DEFAULT_SCAN_CORE: bool = true;
pub const DEFAULT_SCAN_PLUGINS: bool = true;
pub const DEFAULT_SCAN_THEMES: bool = true;
pub const DEFAULT_RUNTIME_CAPTURE: bool = false;
pub const DEFAULT_CAPTURE_SAMPLE: u32 = 0;
pub const DEFAULT_CACHE_EXPIRY_DAYS: u32 = 7;

// ---- Listing ----

/// Default page size for catalogue listings.
pub const DEFAULT_PER_PAGE: u32 = 50;

/// Upper bound on catalogue page size.
pub const MAX_PER_PAGE: u32 = 200;

// ---- Site layout defaults (relative to the site root) ----

pub const DEFAULT_CORE_DIRS: [&str; 2] = ["wp-includes", "wp-admin"];
pub const DEFAULT_PLUGIN_DIR: &str = "wp-content/plugins";
pub const DEFAULT_THEME_DIR: &str = "wp-content/themes";
pub const DEFAULT_DISPATCHER_FILE: &str = "wp-includes/plugin.php";
