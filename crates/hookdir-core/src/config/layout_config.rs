//! Site layout: where the core, plugin, and theme trees live.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CORE_DIRS, DEFAULT_DISPATCHER_FILE, DEFAULT_PLUGIN_DIR, DEFAULT_THEME_DIR,
};

/// Layout as written in `hookdir.toml`. Relative paths resolve against
/// `base_dir`, which itself resolves against the site root.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LayoutConfig {
    /// Site base directory. Default: the site root.
    pub base_dir: Option<PathBuf>,
    /// Core directories. Default: `wp-includes`, `wp-admin`.
    #[serde(default)]
    pub core_dirs: Vec<PathBuf>,
    /// Plugin root. Default: `wp-content/plugins`.
    pub plugin_dir: Option<PathBuf>,
    /// Theme root. Default: `wp-content/themes`.
    pub theme_dir: Option<PathBuf>,
    /// Files that implement hook dispatch; skipped when attributing runtime events.
    #[serde(default)]
    pub dispatcher_files: Vec<PathBuf>,
}

impl LayoutConfig {
    /// Resolve every path against `site_root`. A relative `site_root` is
    /// taken from the working directory, since hosts report absolute stack
    /// frames and those must line up with the resolved roots.
    pub fn resolve(&self, site_root: &Path) -> SiteLayout {
        let site_root = absolute_root(site_root);
        let base = match &self.base_dir {
            Some(dir) => join_if_relative(&site_root, dir),
            None => site_root,
        };

        let core_dirs = if self.core_dirs.is_empty() {
            DEFAULT_CORE_DIRS.iter().map(|d| base.join(d)).collect()
        } else {
            self.core_dirs.iter().map(|d| join_if_relative(&base, d)).collect()
        };

        let plugin_dir = self
            .plugin_dir
            .as_deref()
            .map(|d| join_if_relative(&base, d))
            .unwrap_or_else(|| base.join(DEFAULT_PLUGIN_DIR));

        let theme_dir = self
            .theme_dir
            .as_deref()
            .map(|d| join_if_relative(&base, d))
            .unwrap_or_else(|| base.join(DEFAULT_THEME_DIR));

        let dispatcher_files = if self.dispatcher_files.is_empty() {
            vec![base.join(DEFAULT_DISPATCHER_FILE)]
        } else {
            self.dispatcher_files
                .iter()
                .map(|f| join_if_relative(&base, f))
                .collect()
        };

        SiteLayout {
            base,
            core_dirs,
            plugin_dir,
            theme_dir,
            dispatcher_files,
        }
    }
}

/// Resolved absolute layout of the site being catalogued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    /// Stored file paths are relative to this directory.
    pub base: PathBuf,
    pub core_dirs: Vec<PathBuf>,
    pub plugin_dir: PathBuf,
    pub theme_dir: PathBuf,
    pub dispatcher_files: Vec<PathBuf>,
}

impl SiteLayout {
    /// Default layout rooted at `site_root`.
    pub fn rooted_at(site_root: &Path) -> Self {
        LayoutConfig::default().resolve(site_root)
    }
}

fn absolute_root(site_root: &Path) -> PathBuf {
    match std::path::absolute(site_root) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(root = %site_root.display(), error = %e, "could not make site root absolute");
            site_root.to_path_buf()
        }
    }
}

fn join_if_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
