//! HookRecord — one observed occurrence of a hook registration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of hook a registration call dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookType {
    Action,
    Filter,
    Unknown,
}

impl HookType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookType::Action => "action",
            HookType::Filter => "filter",
            HookType::Unknown => "unknown",
        }
    }

    /// Parse a stored value. Anything unrecognized maps to `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value {
            "action" => HookType::Action,
            "filter" => HookType::Filter,
            _ => HookType::Unknown,
        }
    }
}

impl fmt::Display for HookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the code that registered a hook lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SourceType {
    #[serde(rename = "core")]
    Core,
    #[serde(rename = "plugin")]
    Plugin,
    #[serde(rename = "theme")]
    Theme,
    /// Outside every configured root. Stored as the empty string.
    #[default]
    #[serde(rename = "")]
    Unknown,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Core => "core",
            SourceType::Plugin => "plugin",
            SourceType::Theme => "theme",
            SourceType::Unknown => "",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "core" => SourceType::Core,
            "plugin" => SourceType::Plugin,
            "theme" => SourceType::Theme,
            _ => SourceType::Unknown,
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a record was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    Static,
    Runtime,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::Static => "static",
            DetectionMethod::Runtime => "runtime",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "static" => Some(DetectionMethod::Static),
            "runtime" => Some(DetectionMethod::Runtime),
            _ => None,
        }
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed occurrence of a hook registration.
///
/// No uniqueness is implied: the same hook name appears once per call site
/// (static) or once per sampled event (runtime).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookRecord {
    pub hook_name: String,
    pub hook_type: HookType,
    /// Path relative to the site base, or absolute when outside it.
    pub file_path: Option<String>,
    pub line: Option<u32>,
    pub source_type: SourceType,
    pub source_name: String,
    pub detection_method: DetectionMethod,
    /// Unix seconds. Filled with the insert time when absent.
    pub first_seen: Option<i64>,
    pub last_seen: Option<i64>,
}

impl HookRecord {
    /// A literal registration found by the static extractor.
    pub fn static_call(hook_name: impl Into<String>, hook_type: HookType, line: u32) -> Self {
        Self {
            hook_name: hook_name.into(),
            hook_type,
            file_path: None,
            line: Some(line),
            source_type: SourceType::Unknown,
            source_name: String::new(),
            detection_method: DetectionMethod::Static,
            first_seen: None,
            last_seen: None,
        }
    }

    /// A sampled runtime dispatch. The hook type cannot be known from the event.
    pub fn runtime_event(hook_name: impl Into<String>) -> Self {
        Self {
            hook_name: hook_name.into(),
            hook_type: HookType::Unknown,
            file_path: None,
            line: None,
            source_type: SourceType::Unknown,
            source_name: String::new(),
            detection_method: DetectionMethod::Runtime,
            first_seen: None,
            last_seen: None,
        }
    }

    pub fn with_file(mut self, file_path: impl Into<String>) -> Self {
        let path = file_path.into();
        self.file_path = if path.is_empty() { None } else { Some(path) };
        self
    }

    pub fn with_source(mut self, source_type: SourceType, source_name: impl Into<String>) -> Self {
        self.source_type = source_type;
        self.source_name = source_name.into();
        self
    }

    /// Same record with the timestamps cleared, for content comparisons.
    pub fn without_timestamps(&self) -> Self {
        Self {
            first_seen: None,
            last_seen: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_type_round_trips_through_storage_strings() {
        for st in [SourceType::Core, SourceType::Plugin, SourceType::Theme, SourceType::Unknown] {
            assert_eq!(SourceType::parse(st.as_str()), st);
        }
        assert_eq!(SourceType::parse("mu-plugin"), SourceType::Unknown);
    }

    #[test]
    fn unknown_source_serializes_as_empty_string() {
        let json = serde_json::to_string(&SourceType::Unknown).unwrap();
        assert_eq!(json, "\"\"");
    }

    #[test]
    fn with_file_treats_empty_path_as_absent() {
        let rec = HookRecord::runtime_event("init").with_file("");
        assert!(rec.file_path.is_none());
    }
}
