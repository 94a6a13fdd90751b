//! Static scan configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ACTION_CALLEES, DEFAULT_EXTENSIONS, DEFAULT_FILTER_CALLEES, DEFAULT_SCAN_CORE,
    DEFAULT_SCAN_PLUGINS, DEFAULT_SCAN_THEMES,
};

/// Configuration for the static scanner.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Scan the core directories. Default: true.
    pub scan_core: Option<bool>,
    /// Scan the plugin root. Default: true.
    pub scan_plugins: Option<bool>,
    /// Scan the theme root. Default: true.
    pub scan_themes: Option<bool>,
    /// File extensions (without the dot) treated as source. Default: `["php"]`.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Callees that register actions. Empty means the built-in pair.
    #[serde(default)]
    pub action_callees: Vec<String>,
    /// Callees that register filters. Empty means the built-in pair.
    #[serde(default)]
    pub filter_callees: Vec<String>,
}

impl ScanConfig {
    pub fn effective_scan_core(&self) -> bool {
        self.scan_core.unwrap_or(DEFAULT_SCAN_CORE)
    }

    pub fn effective_scan_plugins(&self) -> bool {
        self.scan_plugins.unwrap_or(DEFAULT_SCAN_PLUGINS)
    }

    pub fn effective_scan_themes(&self) -> bool {
        self.scan_themes.unwrap_or(DEFAULT_SCAN_THEMES)
    }

    /// Extensions, lowercased and without a leading dot.
    pub fn effective_extensions(&self) -> Vec<String> {
        if self.extensions.is_empty() {
            return DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect();
        }
        self.extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect()
    }

    pub fn effective_action_callees(&self) -> Vec<String> {
        if self.action_callees.is_empty() {
            DEFAULT_ACTION_CALLEES.iter().map(|c| c.to_string()).collect()
        } else {
            self.action_callees.clone()
        }
    }

    pub fn effective_filter_callees(&self) -> Vec<String> {
        if self.filter_callees.is_empty() {
            DEFAULT_FILTER_CALLEES.iter().map(|c| c.to_string()).collect()
        } else {
            self.filter_callees.clone()
        }
    }
}
