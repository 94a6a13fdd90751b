//! Top-level hook directory configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{CacheConfig, LayoutConfig, RuntimeConfig, ScanConfig, ScanConfiguration, SiteLayout};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`HOOKDIR_*`)
/// 3. Project config (`hookdir.toml` in the site root)
/// 4. User config (`~/.hookdir/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HookDirConfig {
    pub scan: ScanConfig,
    pub runtime: RuntimeConfig,
    pub cache: CacheConfig,
    pub layout: LayoutConfig,
}

/// Override arguments that can be applied on top of a loaded config.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub scan_core: Option<bool>,
    pub scan_plugins: Option<bool>,
    pub scan_themes: Option<bool>,
    pub runtime_capture: Option<bool>,
    pub capture_sample: Option<i64>,
    pub base_dir: Option<PathBuf>,
}

impl HookDirConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join("hookdir.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): explicit overrides
        if let Some(o) = overrides {
            Self::apply_overrides(&mut config, o);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// The sanitized settings value consumed by the scanner and sampler.
    pub fn settings(&self) -> ScanConfiguration {
        ScanConfiguration {
            scan_core: self.scan.effective_scan_core(),
            scan_plugins: self.scan.effective_scan_plugins(),
            scan_themes: self.scan.effective_scan_themes(),
            runtime_capture: self.runtime.effective_capture(),
            capture_sample: self.runtime.effective_sample(),
            cache_expiry_days: self.cache.effective_expiry_days(),
        }
    }

    /// Resolve the site layout against `site_root`.
    pub fn layout(&self, site_root: &Path) -> SiteLayout {
        self.layout.resolve(site_root)
    }

    /// Validate the configuration values.
    pub fn validate(config: &HookDirConfig) -> Result<(), ConfigError> {
        for (field, names) in [
            ("scan.action_callees", &config.scan.action_callees),
            ("scan.filter_callees", &config.scan.filter_callees),
        ] {
            if let Some(bad) = names.iter().find(|n| !is_identifier(n)) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: format!("'{bad}' is not a function name"),
                });
            }
        }
        if config
            .scan
            .extensions
            .iter()
            .any(|e| e.trim_start_matches('.').is_empty())
        {
            return Err(ConfigError::ValidationFailed {
                field: "scan.extensions".to_string(),
                message: "extensions must be non-empty".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the user config path: `~/.hookdir/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".hookdir").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut HookDirConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: HookDirConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` (or non-empty) value.
    fn merge(base: &mut HookDirConfig, other: &HookDirConfig) {
        // Scan
        if other.scan.scan_core.is_some() {
            base.scan.scan_core = other.scan.scan_core;
        }
        if other.scan.scan_plugins.is_some() {
            base.scan.scan_plugins = other.scan.scan_plugins;
        }
        if other.scan.scan_themes.is_some() {
            base.scan.scan_themes = other.scan.scan_themes;
        }
        if !other.scan.extensions.is_empty() {
            base.scan.extensions = other.scan.extensions.clone();
        }
        if !other.scan.action_callees.is_empty() {
            base.scan.action_callees = other.scan.action_callees.clone();
        }
        if !other.scan.filter_callees.is_empty() {
            base.scan.filter_callees = other.scan.filter_callees.clone();
        }

        // Runtime
        if other.runtime.capture.is_some() {
            base.runtime.capture = other.runtime.capture;
        }
        if other.runtime.sample.is_some() {
            base.runtime.sample = other.runtime.sample;
        }
        if !other.runtime.ignored_hooks.is_empty() {
            base.runtime.ignored_hooks = other.runtime.ignored_hooks.clone();
        }

        // Cache
        if other.cache.expiry_days.is_some() {
            base.cache.expiry_days = other.cache.expiry_days;
        }

        // Layout
        if other.layout.base_dir.is_some() {
            base.layout.base_dir = other.layout.base_dir.clone();
        }
        if !other.layout.core_dirs.is_empty() {
            base.layout.core_dirs = other.layout.core_dirs.clone();
        }
        if other.layout.plugin_dir.is_some() {
            base.layout.plugin_dir = other.layout.plugin_dir.clone();
        }
        if other.layout.theme_dir.is_some() {
            base.layout.theme_dir = other.layout.theme_dir.clone();
        }
        if !other.layout.dispatcher_files.is_empty() {
            base.layout.dispatcher_files = other.layout.dispatcher_files.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `HOOKDIR_SCAN_CORE`, `HOOKDIR_CAPTURE_SAMPLE`, etc.
    fn apply_env_overrides(config: &mut HookDirConfig) {
        if let Some(v) = env_parse::<bool>("HOOKDIR_SCAN_CORE") {
            config.scan.scan_core = Some(v);
        }
        if let Some(v) = env_parse::<bool>("HOOKDIR_SCAN_PLUGINS") {
            config.scan.scan_plugins = Some(v);
        }
        if let Some(v) = env_parse::<bool>("HOOKDIR_SCAN_THEMES") {
            config.scan.scan_themes = Some(v);
        }
        if let Some(v) = env_parse::<bool>("HOOKDIR_RUNTIME_CAPTURE") {
            config.runtime.capture = Some(v);
        }
        if let Some(v) = env_parse::<i64>("HOOKDIR_CAPTURE_SAMPLE") {
            config.runtime.sample = Some(v);
        }
        if let Some(v) = env_parse::<i64>("HOOKDIR_CACHE_EXPIRY_DAYS") {
            config.cache.expiry_days = Some(v);
        }
        if let Ok(val) = std::env::var("HOOKDIR_BASE_DIR") {
            if !val.is_empty() {
                config.layout.base_dir = Some(PathBuf::from(val));
            }
        }
    }

    /// Apply explicit overrides (highest priority).
    pub fn apply_overrides(config: &mut HookDirConfig, o: &ConfigOverrides) {
        if let Some(v) = o.scan_core {
            config.scan.scan_core = Some(v);
        }
        if let Some(v) = o.scan_plugins {
            config.scan.scan_plugins = Some(v);
        }
        if let Some(v) = o.scan_themes {
            config.scan.scan_themes = Some(v);
        }
        if let Some(v) = o.runtime_capture {
            config.runtime.capture = Some(v);
        }
        if let Some(v) = o.capture_sample {
            config.runtime.sample = Some(v);
        }
        if let Some(ref v) = o.base_dir {
            config.layout.base_dir = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.trim().parse().ok()
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
