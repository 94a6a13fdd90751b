//! Markdown catalogue export.

use chrono::{DateTime, Utc};
use hookdir_core::types::FxHashSet;

use crate::types::HookRow;

/// Render `rows` as a markdown catalogue. Rows must already be ordered by
/// hook name; consecutive rows with the same name share one section.
pub fn render_markdown(rows: &[HookRow], generated_at: DateTime<Utc>) -> String {
    let mut lines: Vec<String> = vec![
        "# Site Hooks".to_string(),
        String::new(),
        format!("*Generated: {} UTC*", generated_at.format("%Y-%m-%d %H:%M:%S")),
        String::new(),
        "## Table of Contents".to_string(),
        String::new(),
    ];

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for row in rows {
        let name = row.record.hook_name.as_str();
        if seen.insert(name) {
            lines.push(format!("- [{name}](#{})", slug(name)));
        }
    }
    lines.push(String::new());

    let mut current: Option<&str> = None;
    for row in rows {
        let record = &row.record;
        let name = record.hook_name.as_str();
        if current != Some(name) {
            if current.is_some() {
                lines.push(String::new());
            }
            current = Some(name);
            lines.push("---".to_string());
            lines.push(format!("### {name}"));
            lines.push(String::new());
        }
        let source = format!("{} {}", record.source_type.as_str(), record.source_name);
        lines.push(format!("- {} — {}", record.hook_type.as_str(), source.trim()));
        if let Some(path) = record.file_path.as_deref().filter(|p| !p.is_empty()) {
            lines.push(format!("  - {path}"));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Anchor slug: lowercase alphanumerics and underscores kept, whitespace,
/// dots, slashes and dashes folded into single dashes, everything else
/// dropped.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() || c == '_' {
            out.extend(c.to_lowercase());
        } else if (c.is_whitespace() || matches!(c, '-' | '.' | '/'))
            && !out.is_empty()
            && !out.ends_with('-')
        {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}
