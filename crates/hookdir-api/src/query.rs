//! Listing request and response shapes.

use hookdir_core::constants::{DEFAULT_PER_PAGE, MAX_PER_PAGE};
use hookdir_core::{HookType, SourceType};
use hookdir_storage::{HookFilter, HookRow};
use serde::{Deserialize, Serialize};

/// Catalogue listing parameters as a host receives them.
///
/// Empty strings mean "no filter". A `type` or `source` value that names no
/// stored category matches nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    /// Substring of the hook name.
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub hook_type: Option<String>,
    pub source: Option<String>,
    /// 1-based. Values below 1 become 1.
    pub page: Option<i64>,
    /// Default 50, clamped to 1..=200.
    pub per_page: Option<i64>,
}

impl ListQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).clamp(1, i64::from(u32::MAX)) as u32
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
            .unwrap_or(i64::from(DEFAULT_PER_PAGE))
            .clamp(1, i64::from(MAX_PER_PAGE)) as u32
    }

    /// Storage filter for this query, or `None` when a filter value can
    /// never match a stored record.
    pub fn to_filter(&self) -> Option<HookFilter> {
        let hook_type = match non_empty(&self.hook_type) {
            Some(value) => Some(parse_hook_type(value)?),
            None => None,
        };
        let source_type = match non_empty(&self.source) {
            Some(value) => Some(parse_source_type(value)?),
            None => None,
        };
        let per_page = self.per_page();
        Some(HookFilter {
            search: non_empty(&self.q).map(str::to_string),
            hook_type,
            source_type,
            limit: per_page,
            offset: u64::from(self.page() - 1) * u64::from(per_page),
        })
    }
}

/// One page of catalogue rows.
#[derive(Debug, Clone, Serialize)]
pub struct HookPage {
    pub total: u64,
    pub page: u32,
    #[serde(rename = "perPage")]
    pub per_page: u32,
    pub items: Vec<HookRow>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_hook_type(value: &str) -> Option<HookType> {
    match value {
        "action" => Some(HookType::Action),
        "filter" => Some(HookType::Filter),
        "unknown" => Some(HookType::Unknown),
        _ => None,
    }
}

fn parse_source_type(value: &str) -> Option<SourceType> {
    match value {
        "core" => Some(SourceType::Core),
        "plugin" => Some(SourceType::Plugin),
        "theme" => Some(SourceType::Theme),
        _ => None,
    }
}
