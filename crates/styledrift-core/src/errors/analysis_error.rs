//! Analysis request errors.
//!
//! These are caller misuse: bad options, or windows that do not fit the
//! tokens they are applied to. Too little text is not an error; it is
//! reported through the result status.

use super::error_code::{self, DriftErrorCode};
use super::ConfigError;

/// Errors that reject a drift analysis request up front.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("window_size must be positive, got {0}")]
    InvalidWindowSize(usize),

    #[error("stride must be positive, got {0}")]
    InvalidStride(usize),

    #[error("comparison_mode must be one of sequential, all_pairs, fixed_lag; got {value:?}")]
    InvalidComparisonMode { value: String },

    #[error("lag must be positive, got {0}")]
    InvalidLag(usize),

    #[error("n_words must be positive, got {0}")]
    InvalidWordCount(usize),

    #[error("window {index} ends at token {end}, past the {token_count} tokens given")]
    WindowOutOfRange {
        index: usize,
        end: usize,
        token_count: usize,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl DriftErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidWindowSize(_) => error_code::INVALID_WINDOW_SIZE,
            Self::InvalidStride(_) => error_code::INVALID_STRIDE,
            Self::InvalidComparisonMode { .. } => error_code::INVALID_COMPARISON_MODE,
            Self::InvalidLag(_) => error_code::INVALID_LAG,
            Self::InvalidWordCount(_) => error_code::INVALID_WORD_COUNT,
            Self::WindowOutOfRange { .. } => error_code::WINDOW_OUT_OF_RANGE,
            Self::Config(e) => e.error_code(),
        }
    }
}
