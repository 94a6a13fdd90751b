//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;

/// SmallVec sized for the handful of configured source roots.
pub type SmallVec4<T> = SmallVec<[T; 4]>;
