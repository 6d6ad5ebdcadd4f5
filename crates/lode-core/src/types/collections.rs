//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;

/// SmallVec sized for per-node child lists (at most two by invariant).
pub type SmallVec2<T> = SmallVec<[T; 2]>;
