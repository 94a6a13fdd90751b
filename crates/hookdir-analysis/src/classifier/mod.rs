//! Source Classifier — attributes a file to core, a plugin, or a theme.

pub mod classifier;
pub mod paths;

pub use classifier::{SourceClassifier, SourceRoot};
