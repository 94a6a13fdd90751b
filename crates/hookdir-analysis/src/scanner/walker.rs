//! Recursive source file discovery.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

/// Every file under `roots` whose extension is in `extensions`
/// (case-insensitive, no leading dot). Sorted and deduplicated so files
/// under nested roots are visited once.
///
/// Missing roots and unreadable directories are skipped.
pub fn collect_files(roots: &[PathBuf], extensions: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for root in roots {
        if !root.is_dir() {
            tracing::debug!(root = %root.display(), "scan root missing, skipping");
            continue;
        }
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .build();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::debug!(root = %root.display(), error = %e, "walk error, skipping entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            if has_extension(entry.path(), extensions) {
                files.push(entry.into_path());
            }
        }
    }
    files.sort();
    files.dedup();
    files
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions.iter().any(|want| want.eq_ignore_ascii_case(ext))
}
