//! Runtime capture configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CAPTURE_SAMPLE, DEFAULT_RUNTIME_CAPTURE};

/// Configuration for the runtime sampler.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Listen to live dispatches. Default: false.
    pub capture: Option<bool>,
    /// Capture one in N events; 0 and 1 capture every event. Default: 0.
    pub sample: Option<i64>,
    /// Extra hook names never sampled, on top of the built-in noisy hooks.
    #[serde(default)]
    pub ignored_hooks: Vec<String>,
}

impl RuntimeConfig {
    pub fn effective_capture(&self) -> bool {
        self.capture.unwrap_or(DEFAULT_RUNTIME_CAPTURE)
    }

    /// Returns the effective sample rate; negative values clamp to 0.
    pub fn effective_sample(&self) -> u32 {
        self.sample
            .map(|s| s.clamp(0, u32::MAX as i64) as u32)
            .unwrap_or(DEFAULT_CAPTURE_SAMPLE)
    }
}
