//! styledrift-analysis: Kilgarriff chi-squared drift detection within a
//! single document.
//!
//! The entry points are [`drift::analyze_drift`] for one-off calls with
//! default thresholds and [`drift::DriftAnalyzer`] for configured runs.

pub mod drift;
