//! Stylistic drift detection.
//!
//! Pipeline: windows → global word profile → pairwise chi-squared →
//! trend → pattern classification. Every stage is a pure function of its
//! inputs; only the analyzer knows about data-sufficiency statuses.

pub mod analyzer;
pub mod chi_squared;
pub mod classifier;
pub mod profile;
pub mod scorer;
pub mod thresholds;
pub mod trend;
pub mod types;
pub mod windows;

pub use analyzer::{analyze_drift, DriftAnalyzer, DriftOptions};
pub use classifier::{Classification, PatternClassifier, ScoreStats};
pub use profile::WordProfile;
pub use scorer::PairwiseScorer;
pub use thresholds::DriftThresholds;
pub use trend::{compute_trend, Trend};
pub use types::{DriftMetadata, DriftPattern, DriftResult, DriftStatus, PairwiseScore, WordContribution};
pub use windows::{build_windows, overlap_ratio, Window};

pub use styledrift_core::types::ComparisonMode;
