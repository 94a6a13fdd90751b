//! Path normalization shared by the scanner and the runtime sampler.

use std::path::Path;

/// Forward slashes only, runs of slashes collapsed, no trailing slash
/// (except for a bare root).
pub fn normalize(path: &Path) -> String {
    normalize_str(&path.to_string_lossy())
}

pub fn normalize_str(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_slash = false;
    for c in raw.chars() {
        let c = if c == '\\' { '/' } else { c };
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.push(c);
    }
    if out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

/// The remainder of `path` below `root`, when `path` is `root` itself or
/// lies under it. Both arguments must already be normalized.
pub fn strip_root<'p>(path: &'p str, root: &str) -> Option<&'p str> {
    if root == "/" {
        return path.strip_prefix('/');
    }
    let rest = path.strip_prefix(root)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix('/')
    }
}

/// Path stored for a file: relative to `base` without a leading slash, or
/// the normalized absolute path when the file lies outside `base`.
pub fn relative_path(path: &Path, base: &Path) -> String {
    let path = normalize(path);
    let base = normalize(base);
    match strip_root(&path, &base) {
        Some(rest) => rest.trim_start_matches('/').to_string(),
        None => path,
    }
}

/// First path segment directly below `root`. Empty when `path` is `root`.
pub fn first_segment<'p>(path: &'p str, root: &str) -> Option<&'p str> {
    let rest = strip_root(path, root)?;
    Some(rest.split('/').next().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn backslashes_and_duplicate_slashes() {
        assert_eq!(normalize_str(r"C:\site\\wp-content\plugins\"), "C:/site/wp-content/plugins");
        assert_eq!(normalize_str("/srv//site/"), "/srv/site");
        assert_eq!(normalize_str("/"), "/");
    }

    #[test]
    fn relative_requires_segment_boundary() {
        let base = PathBuf::from("/srv/site");
        assert_eq!(relative_path(Path::new("/srv/site/wp-admin/a.php"), &base), "wp-admin/a.php");
        assert_eq!(relative_path(Path::new("/srv/site2/a.php"), &base), "/srv/site2/a.php");
    }

    #[test]
    fn first_segment_below_root() {
        let root = "/srv/site/wp-content/plugins";
        assert_eq!(first_segment("/srv/site/wp-content/plugins/foo/bar.php", root), Some("foo"));
        assert_eq!(first_segment("/srv/site/wp-content/plugins", root), Some(""));
        assert_eq!(first_segment("/srv/site/wp-content/themes/x.php", root), None);
    }
}
