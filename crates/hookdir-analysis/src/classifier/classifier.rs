//! Longest-matching-root attribution.

use std::path::{Path, PathBuf};

use hookdir_core::types::SmallVec4;
use hookdir_core::{SiteLayout, SourceType};

use super::paths::{first_segment, normalize};

/// A configured directory tagged with the category of code under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoot {
    pub path: PathBuf,
    pub source_type: SourceType,
}

impl SourceRoot {
    pub fn new(path: impl Into<PathBuf>, source_type: SourceType) -> Self {
        Self {
            path: path.into(),
            source_type,
        }
    }
}

/// Classifies absolute file paths against a set of roots.
#[derive(Debug, Clone, Default)]
pub struct SourceClassifier {
    /// Normalized root paths, longest first.
    roots: SmallVec4<(String, SourceType)>,
}

impl SourceClassifier {
    pub fn new(roots: impl IntoIterator<Item = SourceRoot>) -> Self {
        let mut roots: SmallVec4<(String, SourceType)> = roots
            .into_iter()
            .map(|r| (normalize(&r.path), r.source_type))
            .collect();
        // Longest first; ties keep configuration order.
        roots.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { roots }
    }

    /// Every root the layout defines, whatever the scan toggles say.
    pub fn from_layout(layout: &SiteLayout) -> Self {
        Self::new(layout_roots(layout, true, true, true))
    }

    /// `(source_type, source_name)` for an absolute path.
    ///
    /// Core files are named `core`; plugin and theme files take the first
    /// segment below their root (a directory, or the file name for
    /// single-file plugins). Paths outside every root yield `("", "")`.
    pub fn classify(&self, path: &Path) -> (SourceType, String) {
        let path = normalize(path);
        self.classify_normalized(&path)
    }

    pub fn classify_normalized(&self, path: &str) -> (SourceType, String) {
        for (root, source_type) in &self.roots {
            let Some(segment) = first_segment(path, root) else {
                continue;
            };
            return match source_type {
                SourceType::Core => (SourceType::Core, "core".to_string()),
                SourceType::Plugin | SourceType::Theme => (*source_type, segment.to_string()),
                SourceType::Unknown => (SourceType::Unknown, String::new()),
            };
        }
        (SourceType::Unknown, String::new())
    }
}

/// Roots from a layout, filtered by the per-category toggles.
pub fn layout_roots(layout: &SiteLayout, core: bool, plugins: bool, themes: bool) -> Vec<SourceRoot> {
    let mut roots = Vec::new();
    if core {
        roots.extend(
            layout
                .core_dirs
                .iter()
                .map(|d| SourceRoot::new(d.clone(), SourceType::Core)),
        );
    }
    if plugins {
        roots.push(SourceRoot::new(layout.plugin_dir.clone(), SourceType::Plugin));
    }
    if themes {
        roots.push(SourceRoot::new(layout.theme_dir.clone(), SourceType::Theme));
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SourceClassifier {
        SourceClassifier::from_layout(&SiteLayout::rooted_at(Path::new("/srv/site")))
    }

    #[test]
    fn outside_every_root_is_unattributed() {
        let c = site();
        assert_eq!(c.classify(Path::new("/srv/site/index.php")), (SourceType::Unknown, String::new()));
        assert_eq!(c.classify(Path::new("/tmp/elsewhere.php")), (SourceType::Unknown, String::new()));
        assert_eq!(
            c.classify(Path::new("/srv/site/wp-content/uploads/x.php")),
            (SourceType::Unknown, String::new())
        );
    }

    #[test]
    fn longest_root_wins_when_roots_nest() {
        let c = SourceClassifier::new([
            SourceRoot::new("/srv/site", SourceType::Core),
            SourceRoot::new("/srv/site/wp-content/plugins", SourceType::Plugin),
        ]);
        assert_eq!(
            c.classify(Path::new("/srv/site/wp-content/plugins/foo/foo.php")),
            (SourceType::Plugin, "foo".to_string())
        );
        assert_eq!(
            c.classify(Path::new("/srv/site/wp-load.php")),
            (SourceType::Core, "core".to_string())
        );
    }

    #[test]
    fn root_prefix_must_end_on_a_segment_boundary() {
        let c = site();
        assert_eq!(
            c.classify(Path::new("/srv/site/wp-content/plugins-old/x.php")),
            (SourceType::Unknown, String::new())
        );
        assert_eq!(
            c.classify(Path::new("/srv/site/wp-includes-backup/x.php")),
            (SourceType::Unknown, String::new())
        );
    }

    #[test]
    fn path_equal_to_a_root() {
        let c = site();
        assert_eq!(
            c.classify(Path::new("/srv/site/wp-includes")),
            (SourceType::Core, "core".to_string())
        );
        assert_eq!(
            c.classify(Path::new("/srv/site/wp-content/plugins/")),
            (SourceType::Plugin, String::new())
        );
    }

    #[test]
    fn backslash_paths_and_single_file_plugins() {
        let c = site();
        assert_eq!(
            c.classify(Path::new("/srv/site/wp-content\\plugins\\hello.php")),
            (SourceType::Plugin, "hello.php".to_string())
        );
        assert_eq!(
            c.classify(Path::new("/srv/site/wp-content/themes/twenty/functions.php")),
            (SourceType::Theme, "twenty".to_string())
        );
    }
}
