//! Shared types used across styledrift crates.

pub mod collections;
pub mod comparison_mode;

pub use comparison_mode::ComparisonMode;
