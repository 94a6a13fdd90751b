//! HookDirectory — owns the database, the scanner and the write queue.
//!
//! One directory serves a whole process. Hosts either hold their own
//! `HookDirectory` or use the process-wide instance behind `initialize()` /
//! `get()`. Runtime samplers are created per request from it; they are
//! single-threaded and are never stored here.

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, OnceLock};

use chrono::Utc;
use hookdir_analysis::runtime::{LocalHookBus, RuntimeSampler, StackProbe};
use hookdir_analysis::{ScanSummary, StaticScanner};
use hookdir_core::config::{ConfigOverrides, HookDirConfig, ScanConfiguration, SiteLayout};
use hookdir_core::constants::{DRAIN_TASK, VERSION};
use hookdir_core::errors::HookDirError;
use hookdir_core::events::EventDispatcher;
use hookdir_core::tracing::init_tracing;
use hookdir_core::traits::RecordSink;
use hookdir_storage::{
    DatabaseManager, DrainOutcome, HookCache, HookStats, RetentionReport, SqliteScheduler,
};

use crate::query::{HookPage, ListQuery};

static DIRECTORY: OnceLock<Arc<HookDirectory>> = OnceLock::new();

/// Options for opening a directory.
#[derive(Default)]
pub struct DirectoryOptions {
    /// Path to the database. Defaults to `<site_root>/.hookdir/hooks.db`.
    pub db_path: Option<PathBuf>,
    /// Site root the layout resolves against. Defaults to the working directory.
    pub site_root: Option<PathBuf>,
    /// TOML configuration. When set, the file and environment layers are
    /// skipped.
    pub config_toml: Option<String>,
    pub overrides: Option<ConfigOverrides>,
    pub events: EventDispatcher,
}

/// The hook directory for one site.
pub struct HookDirectory {
    config: HookDirConfig,
    settings: ScanConfiguration,
    layout: SiteLayout,
    scheduler: Arc<SqliteScheduler>,
    cache: Arc<HookCache>,
    scanner: StaticScanner,
}

impl HookDirectory {
    pub fn open(opts: DirectoryOptions) -> Result<Self, HookDirError> {
        init_tracing();

        let site_root = opts.site_root.unwrap_or_else(|| PathBuf::from("."));
        let config = match &opts.config_toml {
            Some(toml_str) => {
                let mut config = HookDirConfig::from_toml(toml_str)?;
                if let Some(o) = &opts.overrides {
                    HookDirConfig::apply_overrides(&mut config, o);
                }
                config
            }
            None => HookDirConfig::load(&site_root, opts.overrides.as_ref())?,
        };

        let db_path = match opts.db_path {
            Some(path) => path,
            None => site_root.join(".hookdir").join("hooks.db"),
        };
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| HookDirError::Init {
                message: format!("failed to create database directory {}: {e}", parent.display()),
            })?;
        }

        let db = Arc::new(DatabaseManager::open(&db_path)?);
        let scheduler = Arc::new(SqliteScheduler::new(Arc::clone(&db)));
        let cache = Arc::new(
            HookCache::new(Arc::clone(&db), scheduler.clone()).with_events(opts.events.clone()),
        );
        let scanner = StaticScanner::from_config(&config, &site_root).with_events(opts.events);

        let settings = config.settings();
        let layout = config.layout(&site_root);
        tracing::info!(
            version = VERSION,
            db = %db_path.display(),
            base = %layout.base.display(),
            runtime_capture = settings.runtime_capture,
            "hook directory opened"
        );

        Ok(Self {
            config,
            settings,
            layout,
            scheduler,
            cache,
            scanner,
        })
    }

    pub fn config(&self) -> &HookDirConfig {
        &self.config
    }

    pub fn settings(&self) -> ScanConfiguration {
        self.settings
    }

    pub fn layout(&self) -> &SiteLayout {
        &self.layout
    }

    pub fn cache(&self) -> &Arc<HookCache> {
        &self.cache
    }

    pub fn scheduler(&self) -> &Arc<SqliteScheduler> {
        &self.scheduler
    }

    /// Full static scan. Returns the number of records handled; the tail of
    /// a large result drains through `run_due_tasks`.
    pub fn scan(&self) -> usize {
        self.scanner.scan(self.cache.as_ref())
    }

    pub fn scan_with_summary(&self) -> ScanSummary {
        self.scanner.scan_with_summary(self.cache.as_ref())
    }

    pub fn list(&self, query: &ListQuery) -> Result<HookPage, HookDirError> {
        let page = query.page();
        let per_page = query.per_page();
        let Some(filter) = query.to_filter() else {
            return Ok(HookPage {
                total: 0,
                page,
                per_page,
                items: Vec::new(),
            });
        };
        let (total, items) = self.cache.list(&filter)?;
        Ok(HookPage {
            total,
            page,
            per_page,
            items,
        })
    }

    pub fn stats(&self) -> Result<HookStats, HookDirError> {
        Ok(self.cache.stats()?)
    }

    /// Markdown catalogue of every stored record, stamped with the current time.
    pub fn docs_markdown(&self) -> Result<String, HookDirError> {
        Ok(self.cache.docs_markdown(Utc::now())?)
    }

    /// Run the queue drain if its tick is due at `now`. Returns `None` when
    /// nothing was due.
    pub fn run_due_tasks(&self, now: i64) -> Result<Option<DrainOutcome>, HookDirError> {
        if !self.scheduler.take_due(DRAIN_TASK, now)? {
            return Ok(None);
        }
        Ok(Some(self.cache.drain_one_chunk(now)?))
    }

    /// Delete runtime records older than the configured expiry.
    pub fn purge_expired_runtime(&self, now: i64) -> Result<RetentionReport, HookDirError> {
        Ok(self
            .cache
            .purge_expired_runtime(self.settings.cache_expiry_days, now)?)
    }

    /// A sampler for one request, persisting into this directory.
    pub fn runtime_sampler(&self, stack: Rc<dyn StackProbe>) -> Rc<RuntimeSampler> {
        let sink: Arc<dyn RecordSink> = self.cache.clone();
        Rc::new(
            RuntimeSampler::new(&self.settings, &self.layout, stack, sink)
                .with_ignored_hooks(self.config.runtime.ignored_hooks.iter().cloned()),
        )
    }

    /// Create a sampler reading `bus`'s stack and register it on `bus`.
    /// `None` when runtime capture is disabled.
    pub fn attach_runtime(&self, bus: &LocalHookBus) -> Option<Rc<RuntimeSampler>> {
        let stack: Rc<dyn StackProbe> = bus.stack().clone();
        let sampler = self.runtime_sampler(stack);
        sampler.start(bus).then_some(sampler)
    }

    /// Database file backing this directory.
    pub fn db_path(&self) -> Option<&Path> {
        self.cache.db().path()
    }
}

/// Open the process-wide directory. Later calls return the first instance
/// and ignore their options.
pub fn initialize(opts: DirectoryOptions) -> Result<Arc<HookDirectory>, HookDirError> {
    if let Some(existing) = DIRECTORY.get() {
        return Ok(Arc::clone(existing));
    }
    let directory = Arc::new(HookDirectory::open(opts)?);
    Ok(Arc::clone(DIRECTORY.get_or_init(|| directory)))
}

/// The process-wide directory.
pub fn get() -> Result<Arc<HookDirectory>, HookDirError> {
    DIRECTORY.get().cloned().ok_or_else(|| HookDirError::Init {
        message: "hook directory not initialized; call initialize() first".to_string(),
    })
}
