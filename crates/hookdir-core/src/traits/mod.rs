//! Seam traits between the analysis and storage crates.

pub mod scheduler;
pub mod sink;

pub use scheduler::TaskScheduler;
pub use sink::{RecordSink, StaticReplace};
