//! Configuration system for styledrift.
//! TOML-based, 4-layer resolution: CLI > env > project > user > defaults.

pub mod analysis_config;
pub mod styledrift_config;
pub mod threshold_config;

pub use analysis_config::AnalysisConfig;
pub use styledrift_config::{CliOverrides, StyleDriftConfig};
pub use threshold_config::ThresholdConfig;
