//! Span names used across styledrift.
//!
//! Keeping them in one place lets log filters and queries match on a
//! stable name rather than on whatever a call site happened to write.

/// Orchestrator: one span per drift analysis.
pub const ANALYZE_DRIFT_SPAN: &str = "analyze_drift";

/// Scorer: pairwise chi-squared over all generated pairs.
pub const SCORE_PAIRS_SPAN: &str = "score_pairs";
