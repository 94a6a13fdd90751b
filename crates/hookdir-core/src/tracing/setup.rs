//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for the hook directory.
///
/// Reads `HOOKDIR_LOG` for per-subsystem levels, e.g.
/// `HOOKDIR_LOG=hookdir_analysis=debug,hookdir_storage=warn`.
/// Falls back to `hookdir=info` when unset or invalid.
///
/// Idempotent. If another subscriber is already installed, this one is not.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("HOOKDIR_LOG")
            .unwrap_or_else(|_| EnvFilter::new("hookdir=info"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
