//! Listing, filtering and stats against the migrated schema.

use std::sync::Arc;

use hookdir_core::traits::{RecordSink, StaticReplace};
use hookdir_core::{HookRecord, HookType, SourceType};
use hookdir_storage::{DatabaseManager, HookCache, HookFilter, SqliteScheduler};

fn cache() -> HookCache {
    let db = Arc::new(DatabaseManager::open_in_memory().unwrap());
    let scheduler = Arc::new(SqliteScheduler::new(Arc::clone(&db)));
    HookCache::new(db, scheduler)
}

fn seeded() -> HookCache {
    let cache = cache();
    cache.replace_static_entries(vec![
        HookRecord::static_call("save_post", HookType::Action, 10)
            .with_file("wp-includes/post.php")
            .with_source(SourceType::Core, "core"),
        HookRecord::static_call("save_post_page", HookType::Action, 12)
            .with_file("wp-includes/post.php")
            .with_source(SourceType::Core, "core"),
        HookRecord::static_call("savexpost", HookType::Filter, 3)
            .with_file("wp-content/plugins/foo/foo.php")
            .with_source(SourceType::Plugin, "foo"),
        HookRecord::static_call("the_content", HookType::Filter, 40)
            .with_file("wp-content/themes/bar/functions.php")
            .with_source(SourceType::Theme, "bar"),
        HookRecord::static_call("init", HookType::Action, 1)
            .with_file("wp-content/plugins/foo/foo.php")
            .with_source(SourceType::Plugin, "foo"),
    ]);
    cache
        .insert_record(&HookRecord::runtime_event("init"))
        .unwrap();
    cache
        .insert_record(&HookRecord::runtime_event("discount_100%"))
        .unwrap();
    cache
}

fn page(search: Option<&str>, hook_type: Option<HookType>, source: Option<SourceType>) -> HookFilter {
    HookFilter {
        search: search.map(str::to_string),
        hook_type,
        source_type: source,
        limit: 50,
        offset: 0,
    }
}

fn names(cache: &HookCache, filter: &HookFilter) -> (u64, Vec<String>) {
    let (total, rows) = cache.list(filter).unwrap();
    (total, rows.into_iter().map(|r| r.record.hook_name).collect())
}

#[test]
fn list_is_ordered_by_name_then_id() {
    let cache = seeded();
    let (total, found) = names(&cache, &page(None, None, None));
    assert_eq!(total, 7);
    assert_eq!(
        found,
        vec![
            "discount_100%",
            "init",
            "init",
            "save_post",
            "save_post_page",
            "savexpost",
            "the_content"
        ]
    );
}

#[test]
fn search_treats_like_metacharacters_literally() {
    let cache = seeded();
    let (total, found) = names(&cache, &page(Some("save_post"), None, None));
    assert_eq!(total, 2);
    assert_eq!(found, vec!["save_post", "save_post_page"]);

    let (total, found) = names(&cache, &page(Some("100%"), None, None));
    assert_eq!(total, 1);
    assert_eq!(found, vec!["discount_100%"]);

    let (total, _) = names(&cache, &page(Some("%"), None, None));
    assert_eq!(total, 1);
}

#[test]
fn empty_search_matches_everything() {
    let cache = seeded();
    let (total, _) = names(&cache, &page(Some(""), None, None));
    assert_eq!(total, 7);
}

#[test]
fn type_and_source_filters_combine() {
    let cache = seeded();
    let (total, found) = names(&cache, &page(None, Some(HookType::Filter), None));
    assert_eq!(total, 2);
    assert_eq!(found, vec!["savexpost", "the_content"]);

    let (total, found) = names(
        &cache,
        &page(None, Some(HookType::Action), Some(SourceType::Plugin)),
    );
    assert_eq!(total, 1);
    assert_eq!(found, vec!["init"]);

    let (total, _) = names(&cache, &page(None, None, Some(SourceType::Unknown)));
    assert_eq!(total, 2, "runtime records without attribution");
}

#[test]
fn pagination_reports_full_total() {
    let cache = seeded();
    let filter = HookFilter {
        limit: 3,
        offset: 3,
        ..HookFilter::default()
    };
    let (total, found) = names(&cache, &filter);
    assert_eq!(total, 7);
    assert_eq!(found, vec!["save_post", "save_post_page", "savexpost"]);

    let past_end = HookFilter {
        limit: 3,
        offset: 30,
        ..HookFilter::default()
    };
    let (total, found) = names(&cache, &past_end);
    assert_eq!(total, 7);
    assert!(found.is_empty());
}

#[test]
fn stats_group_by_type_and_source() {
    let cache = seeded();
    cache.record_last_scan(1_700_000_123);

    let stats = cache.stats().unwrap();
    assert_eq!(stats.total, 7);
    assert_eq!(stats.by_type.get("action"), Some(&3));
    assert_eq!(stats.by_type.get("filter"), Some(&2));
    assert_eq!(stats.by_type.get("unknown"), Some(&2));
    assert_eq!(stats.by_source.get("core"), Some(&2));
    assert_eq!(stats.by_source.get("plugin"), Some(&2));
    assert_eq!(stats.by_source.get("theme"), Some(&1));
    assert_eq!(stats.by_source.get(""), Some(&2));
    assert_eq!(stats.last_scan, 1_700_000_123);
}

#[test]
fn stats_on_empty_catalogue() {
    let stats = cache().stats().unwrap();
    assert_eq!(stats.total, 0);
    assert!(stats.by_type.is_empty());
    assert!(stats.by_source.is_empty());
    assert_eq!(stats.last_scan, 0);
}

#[test]
fn rows_serialize_flat() {
    let cache = seeded();
    let (_, rows) = cache.list(&page(Some("the_content"), None, None)).unwrap();
    let json = serde_json::to_value(&rows[0]).unwrap();
    assert_eq!(json["hook_name"], "the_content");
    assert_eq!(json["hook_type"], "filter");
    assert_eq!(json["source_type"], "theme");
    assert_eq!(json["line"], 40);
    assert!(json["id"].as_i64().unwrap() > 0);
}
