//! Configuration system for the hook directory.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod cache_config;
pub mod hookdir_config;
pub mod layout_config;
pub mod runtime_config;
pub mod scan_config;
pub mod settings;

pub use cache_config::CacheConfig;
pub use hookdir_config::{ConfigOverrides, HookDirConfig};
pub use layout_config::{LayoutConfig, SiteLayout};
pub use runtime_config::RuntimeConfig;
pub use scan_config::ScanConfig;
pub use settings::ScanConfiguration;
