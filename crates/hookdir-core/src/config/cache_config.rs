//! Cache configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_CACHE_EXPIRY_DAYS;

/// Configuration for stored runtime records.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CacheConfig {
    /// Age in days after which an external purge may drop runtime records. Default: 7.
    pub expiry_days: Option<i64>,
}

impl CacheConfig {
    /// Returns the effective expiry, clamped to at least one day.
    pub fn effective_expiry_days(&self) -> u32 {
        self.expiry_days
            .map(|d| d.clamp(1, u32::MAX as i64) as u32)
            .unwrap_or(DEFAULT_CACHE_EXPIRY_DAYS)
    }
}
