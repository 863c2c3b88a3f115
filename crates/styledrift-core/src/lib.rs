//! styledrift-core: errors, configuration, tracing, and shared types
//! for the styledrift analysis engine.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;
