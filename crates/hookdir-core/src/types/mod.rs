//! Data model and collection aliases.

pub mod collections;
pub mod record;

pub use collections::{FxHashMap, FxHashSet, SmallVec4};
pub use record::{DetectionMethod, HookRecord, HookType, SourceType};
