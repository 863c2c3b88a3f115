//! Windowing and comparison configuration.

use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;
use crate::types::ComparisonMode;

pub const DEFAULT_WINDOW_SIZE: usize = 1000;
pub const DEFAULT_STRIDE: usize = 500;
pub const DEFAULT_N_WORDS: usize = 500;
pub const DEFAULT_LAG: usize = 1;
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Configuration for the drift analysis pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Tokens per window. Default: 1000.
    pub window_size: Option<usize>,
    /// Tokens between window starts. Default: 500.
    pub stride: Option<usize>,
    /// `sequential`, `all_pairs`, or `fixed_lag`. Default: sequential.
    pub comparison_mode: Option<String>,
    /// Window distance for `fixed_lag`. Default: 1.
    pub lag: Option<usize>,
    /// Size of the global most-frequent-word profile. Default: 500.
    pub n_words: Option<usize>,
    /// Pair count at which scoring switches to rayon. Default: 64.
    pub parallel_threshold: Option<usize>,
}

impl AnalysisConfig {
    pub fn effective_window_size(&self) -> usize {
        self.window_size.unwrap_or(DEFAULT_WINDOW_SIZE)
    }

    pub fn effective_stride(&self) -> usize {
        self.stride.unwrap_or(DEFAULT_STRIDE)
    }

    pub fn effective_lag(&self) -> usize {
        self.lag.unwrap_or(DEFAULT_LAG)
    }

    pub fn effective_n_words(&self) -> usize {
        self.n_words.unwrap_or(DEFAULT_N_WORDS)
    }

    pub fn effective_parallel_threshold(&self) -> usize {
        self.parallel_threshold.unwrap_or(DEFAULT_PARALLEL_THRESHOLD)
    }

    /// Parses the configured mode, defaulting to sequential.
    pub fn effective_comparison_mode(&self) -> Result<ComparisonMode, AnalysisError> {
        match self.comparison_mode.as_deref() {
            Some(mode) => mode.parse(),
            None => Ok(ComparisonMode::default()),
        }
    }
}
