//! Fast hash collections used by the word counters.

pub use rustc_hash::FxHashMap;
