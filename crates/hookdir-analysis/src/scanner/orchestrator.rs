//! StaticScanner — one full static scan per call.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use hookdir_core::config::{HookDirConfig, ScanConfiguration, SiteLayout};
use hookdir_core::errors::ScanError;
use hookdir_core::events::types::{FileSkippedEvent, ScanCompleteEvent, ScanStartedEvent};
use hookdir_core::events::EventDispatcher;
use hookdir_core::time::unix_now;
use hookdir_core::traits::StaticReplace;
use hookdir_core::HookRecord;

use super::types::{CollectedRecords, ScanSummary};
use super::walker::collect_files;
use crate::classifier::classifier::layout_roots;
use crate::classifier::paths::relative_path;
use crate::classifier::{SourceClassifier, SourceRoot};
use crate::extractor::{CallSiteExtractor, CalleeTable};

/// Walks the enabled roots and replaces the stored static records.
///
/// A scan runs to completion. Unreadable files and missing roots are
/// skipped; a scan that reads nothing stores an empty set.
pub struct StaticScanner {
    settings: ScanConfiguration,
    layout: SiteLayout,
    extensions: Vec<String>,
    extractor: CallSiteExtractor,
    classifier: SourceClassifier,
    events: EventDispatcher,
}

impl StaticScanner {
    pub fn new(
        settings: ScanConfiguration,
        layout: SiteLayout,
        extractor: CallSiteExtractor,
        extensions: Vec<String>,
    ) -> Self {
        let classifier = SourceClassifier::from_layout(&layout);
        Self {
            settings,
            layout,
            extensions,
            extractor,
            classifier,
            events: EventDispatcher::new(),
        }
    }

    /// Scanner for `site_root` with settings, layout, callees and extensions
    /// taken from `config`.
    pub fn from_config(config: &HookDirConfig, site_root: &Path) -> Self {
        Self::new(
            config.settings(),
            config.layout(site_root),
            CallSiteExtractor::new(CalleeTable::from_config(&config.scan)),
            config.scan.effective_extensions(),
        )
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.events = events;
        self
    }

    /// Roots enabled by the scan toggles. Empty when every toggle is off.
    pub fn scan_roots(&self) -> Vec<SourceRoot> {
        layout_roots(
            &self.layout,
            self.settings.scan_core,
            self.settings.scan_plugins,
            self.settings.scan_themes,
        )
    }

    /// Full scan: collect, replace the stored static set, stamp the scan
    /// time. Returns the number of records the store handled.
    pub fn scan(&self, store: &dyn StaticReplace) -> usize {
        self.scan_with_summary(store).records_stored
    }

    pub fn scan_with_summary(&self, store: &dyn StaticReplace) -> ScanSummary {
        let start = Instant::now();
        let CollectedRecords {
            records,
            mut summary,
        } = self.collect();

        summary.records_stored = store.replace_static_entries(records);
        store.record_last_scan(unix_now());
        summary.duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            files = summary.files_scanned,
            skipped = summary.files_skipped,
            found = summary.records_found,
            stored = summary.records_stored,
            duration_ms = summary.duration_ms,
            "static scan complete"
        );
        self.events.emit_scan_complete(&ScanCompleteEvent {
            files_scanned: summary.files_scanned,
            files_skipped: summary.files_skipped,
            records_found: summary.records_found,
            records_stored: summary.records_stored,
            duration_ms: summary.duration_ms,
        });
        summary
    }

    /// Walk and extract without touching storage. Record order follows the
    /// sorted file list, then source order within each file.
    pub fn collect(&self) -> CollectedRecords {
        let start = Instant::now();
        let roots: Vec<PathBuf> = self.scan_roots().into_iter().map(|r| r.path).collect();
        let files = collect_files(&roots, &self.extensions);

        self.events.emit_scan_started(&ScanStartedEvent {
            roots: roots.clone(),
            file_count: files.len(),
        });
        tracing::debug!(roots = roots.len(), files = files.len(), "static scan started");

        let per_file: Vec<(&PathBuf, Result<Vec<HookRecord>, ScanError>)> = files
            .par_iter()
            .map(|path| (path, self.scan_file(path)))
            .collect();

        let mut records = Vec::new();
        let mut files_scanned = 0;
        let mut files_skipped = 0;
        for (path, result) in per_file {
            match result {
                Ok(found) => {
                    files_scanned += 1;
                    records.extend(found);
                }
                Err(e) => {
                    files_skipped += 1;
                    tracing::debug!(path = %path.display(), error = %e, "skipping unreadable file");
                    self.events.emit_file_skipped(&FileSkippedEvent {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let summary = ScanSummary {
            roots: roots.len(),
            files_scanned,
            files_skipped,
            records_found: records.len(),
            records_stored: 0,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        CollectedRecords { records, summary }
    }

    /// Records for one file, with path and source attribution filled in.
    pub fn scan_file(&self, path: &Path) -> Result<Vec<HookRecord>, ScanError> {
        let bytes = std::fs::read(path).map_err(|e| ScanError::from_io(path, e))?;
        let source = String::from_utf8_lossy(&bytes);

        let found = self.extractor.extract_source(&source);
        if found.is_empty() {
            return Ok(found);
        }

        let file_path = relative_path(path, &self.layout.base);
        let (source_type, source_name) = self.classifier.classify(path);
        Ok(found
            .into_iter()
            .map(|r| {
                r.with_file(file_path.clone())
                    .with_source(source_type, source_name.clone())
            })
            .collect())
    }
}
