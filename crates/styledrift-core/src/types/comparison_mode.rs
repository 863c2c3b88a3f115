//! Window pairing strategies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;

/// Which window pairs get a chi-squared score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// `(0,1), (1,2), …`: each window against its successor.
    #[default]
    Sequential,
    /// Every `(i, j)` with `i < j`.
    AllPairs,
    /// `(i, i + lag)` for a configured lag.
    FixedLag,
}

impl ComparisonMode {
    pub const ALL: [ComparisonMode; 3] = [Self::Sequential, Self::AllPairs, Self::FixedLag];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::AllPairs => "all_pairs",
            Self::FixedLag => "fixed_lag",
        }
    }

    /// Number of pairs this mode generates over `window_count` windows.
    pub fn pair_count(&self, window_count: usize, lag: usize) -> usize {
        match self {
            Self::Sequential => window_count.saturating_sub(1),
            Self::AllPairs => window_count * window_count.saturating_sub(1) / 2,
            Self::FixedLag => window_count.saturating_sub(lag),
        }
    }

    /// True when pairs are generated in document order, so a trend over
    /// their scores is meaningful.
    pub fn is_positional(&self) -> bool {
        !matches!(self, Self::AllPairs)
    }
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ComparisonMode {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(Self::Sequential),
            "all_pairs" => Ok(Self::AllPairs),
            "fixed_lag" => Ok(Self::FixedLag),
            other => Err(AnalysisError::InvalidComparisonMode {
                value: other.to_string(),
            }),
        }
    }
}
