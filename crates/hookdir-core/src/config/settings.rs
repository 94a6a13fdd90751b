//! ScanConfiguration — the settings value handed to the scanner and sampler.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CACHE_EXPIRY_DAYS, DEFAULT_CAPTURE_SAMPLE, DEFAULT_RUNTIME_CAPTURE, DEFAULT_SCAN_CORE,
    DEFAULT_SCAN_PLUGINS, DEFAULT_SCAN_THEMES,
};

/// Resolved, sanitized settings. Constructed once and passed by value into
/// the orchestrator and sampler; nothing in the core looks settings up
/// ambiently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfiguration {
    pub scan_core: bool,
    pub scan_plugins: bool,
    pub scan_themes: bool,
    pub runtime_capture: bool,
    /// 0 and 1 both mean "capture every event".
    pub capture_sample: u32,
    /// Always >= 1.
    pub cache_expiry_days: u32,
}

impl ScanConfiguration {
    /// Build from raw values, clamping the numeric fields into range.
    pub fn sanitized(
        scan_core: bool,
        scan_plugins: bool,
        scan_themes: bool,
        runtime_capture: bool,
        capture_sample: i64,
        cache_expiry_days: i64,
    ) -> Self {
        Self {
            scan_core,
            scan_plugins,
            scan_themes,
            runtime_capture,
            capture_sample: capture_sample.clamp(0, u32::MAX as i64) as u32,
            cache_expiry_days: cache_expiry_days.clamp(1, u32::MAX as i64) as u32,
        }
    }
}

impl Default for ScanConfiguration {
    fn default() -> Self {
        Self {
            scan_core: DEFAULT_SCAN_CORE,
            scan_plugins: DEFAULT_SCAN_PLUGINS,
            scan_themes: DEFAULT_SCAN_THEMES,
            runtime_capture: DEFAULT_RUNTIME_CAPTURE,
            capture_sample: DEFAULT_CAPTURE_SAMPLE,
            cache_expiry_days: DEFAULT_CACHE_EXPIRY_DAYS,
        }
    }
}
