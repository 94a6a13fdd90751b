//! Core types, traits, errors, config, events, and tracing for the hook directory.
//!
//! Everything the analysis and storage crates share lives here: the
//! `HookRecord` data model, the `ScanConfiguration` value, the seam traits
//! the scanner and sampler write through, and the ambient stack.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod time;
pub mod tracing;
pub mod traits;
pub mod types;

pub use config::{HookDirConfig, ScanConfiguration, SiteLayout};
pub use types::{DetectionMethod, HookRecord, HookType, SourceType};
