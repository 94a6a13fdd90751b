//! V001: hook catalogue and options.

pub const MIGRATION_SQL: &str = r#"
-- One row per observed hook occurrence. No uniqueness: a hook appears once
-- per static call site and once per sampled runtime event.
CREATE TABLE IF NOT EXISTS hook_entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    hook_name TEXT NOT NULL CHECK (hook_name <> '' AND length(hook_name) <= 191),
    hook_type TEXT NOT NULL DEFAULT 'unknown'
        CHECK (hook_type IN ('action', 'filter', 'unknown')),
    file_path TEXT,
    line INTEGER CHECK (line IS NULL OR line >= 0),
    source_type TEXT NOT NULL DEFAULT ''
        CHECK (source_type IN ('core', 'plugin', 'theme', '')),
    source_name TEXT NOT NULL DEFAULT '',
    detection_method TEXT NOT NULL
        CHECK (detection_method IN ('static', 'runtime')),
    first_seen INTEGER NOT NULL,
    last_seen INTEGER NOT NULL,
    meta TEXT
) STRICT;

CREATE INDEX IF NOT EXISTS idx_hook_entries_name
    ON hook_entries(hook_name);
CREATE INDEX IF NOT EXISTS idx_hook_entries_source
    ON hook_entries(source_type);
CREATE INDEX IF NOT EXISTS idx_hook_entries_name_source
    ON hook_entries(hook_name, source_type);
CREATE INDEX IF NOT EXISTS idx_hook_entries_method
    ON hook_entries(detection_method);

-- Small key/value store: last_scan, static_generation.
CREATE TABLE IF NOT EXISTS options (
    name TEXT PRIMARY KEY,
    value TEXT NOT NULL
) STRICT;
"#;

#[cfg(test)]
mod tests {
    use hookdir_core::constants::HOOK_NAME_MAX_LEN;

    use super::MIGRATION_SQL;

    #[test]
    fn name_check_matches_the_name_limit() {
        let check = format!("length(hook_name) <= {HOOK_NAME_MAX_LEN})");
        assert!(MIGRATION_SQL.contains(&check));
    }
}
