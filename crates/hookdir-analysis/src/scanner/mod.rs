//! Static Scan Orchestrator — walk the configured roots, extract, classify,
//! and hand the result to the store.

pub mod orchestrator;
pub mod types;
pub mod walker;

pub use orchestrator::StaticScanner;
pub use types::ScanSummary;
