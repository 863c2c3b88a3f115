//! Result types for drift analysis.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use smallvec::SmallVec;
use styledrift_core::types::ComparisonMode;

use super::chi_squared::TOP_CONTRIBUTORS;
use super::thresholds::DriftThresholds;

/// Identifies the method in serialized results.
pub const METHOD: &str = "kilgarriff_chi_squared_2001";

/// How much data the analysis had to work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftStatus {
    /// Enough windows for unconstrained confidence.
    Ok,
    /// Classified, but confidence is capped.
    MarginalData,
    /// Too few windows (or pairs) to classify.
    InsufficientData,
}

impl DriftStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::MarginalData => "marginal_data",
            Self::InsufficientData => "insufficient_data",
        }
    }
}

impl fmt::Display for DriftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape of the divergence-score sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftPattern {
    /// Stable divergence throughout; typical single-author writing.
    Consistent,
    /// Divergence rises (or falls) steadily across the document.
    GradualDrift,
    /// One region stands out sharply; pasted content or a change of author.
    SuddenSpike,
    /// Near-zero, near-constant divergence; templated or generated text.
    SuspiciouslyUniform,
    /// No confident classification.
    Unknown,
}

impl DriftPattern {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Consistent => "consistent",
            Self::GradualDrift => "gradual_drift",
            Self::SuddenSpike => "sudden_spike",
            Self::SuspiciouslyUniform => "suspiciously_uniform",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DriftPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A word's share of one pair's chi-squared value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordContribution {
    pub word: String,
    pub count_a: u32,
    pub count_b: u32,
    pub contribution: f64,
}

/// Chi-squared comparison of two windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseScore {
    pub window_a: usize,
    pub window_b: usize,
    pub chi_squared: f64,
    pub degrees_of_freedom: usize,
    pub p_value: Option<f64>,
    /// Most divergent profile words, largest contribution first.
    pub top_words: SmallVec<[WordContribution; TOP_CONTRIBUTORS]>,
    pub window_a_size: usize,
    pub window_b_size: usize,
}

/// Bookkeeping about the run, for reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftMetadata {
    pub total_tokens: usize,
    pub tokens_per_window: usize,
    pub comparisons_made: usize,
    pub profile_size: usize,
    /// Set for `fixed_lag` only.
    pub lag: Option<usize>,
    pub method: String,
}

/// Outcome of one drift analysis. Built once, never mutated.
///
/// When `status` is `InsufficientData` the score statistics are NaN
/// (serialized as `null`), `pattern` and `max_location` are `None`, and
/// `pairwise_scores` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftResult {
    pub status: DriftStatus,
    /// Empty when `status` is `Ok`.
    pub status_message: String,
    pub pattern: Option<DriftPattern>,
    pub pattern_confidence: f64,

    #[serde(deserialize_with = "null_as_nan")]
    pub mean_chi_squared: f64,
    #[serde(deserialize_with = "null_as_nan")]
    pub std_chi_squared: f64,
    #[serde(deserialize_with = "null_as_nan")]
    pub min_chi_squared: f64,
    #[serde(deserialize_with = "null_as_nan")]
    pub max_chi_squared: f64,
    /// Index into `pairwise_scores` of the largest score.
    pub max_location: Option<usize>,

    /// Slope of the score sequence; 0.0 for `all_pairs`.
    pub trend: f64,
    pub trend_r_squared: f64,

    pub window_size: usize,
    pub stride: usize,
    pub window_count: usize,
    pub overlap_ratio: f64,
    pub comparison_mode: ComparisonMode,

    /// Generation order of the comparison mode.
    pub pairwise_scores: Vec<PairwiseScore>,
    /// `window_count × window_count`, symmetric, zero diagonal.
    /// Only for `all_pairs`.
    pub distance_matrix: Option<Vec<Vec<f64>>>,

    pub thresholds: DriftThresholds,
    pub metadata: DriftMetadata,
}

impl DriftResult {
    /// The chi-squared values alone, in generation order.
    pub fn chi_squared_values(&self) -> Vec<f64> {
        self.pairwise_scores.iter().map(|s| s.chi_squared).collect()
    }

    /// True when a pattern was assigned.
    pub fn is_classified(&self) -> bool {
        self.pattern.is_some()
    }

    /// The pair with the largest chi-squared value.
    pub fn max_pair(&self) -> Option<&PairwiseScore> {
        self.max_location.and_then(|i| self.pairwise_scores.get(i))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Reads the `null` that serde_json writes for NaN back as NaN.
fn null_as_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}
