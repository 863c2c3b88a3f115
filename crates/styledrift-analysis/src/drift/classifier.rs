//! Threshold-driven pattern classification.
//!
//! Rules are tried from the narrowest claim to the broadest; the first
//! match wins:
//!
//! 1. suspiciously uniform: low mean with a low coefficient of variation
//! 2. sudden spike: max far above the mean and above an absolute floor
//! 3. gradual drift: steep, well-fit trend
//! 4. consistent: none of the above
//!
//! `unknown` is returned when the inputs cannot support a claim at all.

use serde::{Deserialize, Serialize};

use super::thresholds::DriftThresholds;
use super::trend::Trend;
use super::types::DriftPattern;

/// Rule strength reported for the `consistent` default.
const CONSISTENT_STRENGTH: f64 = 0.8;

/// Summary statistics of a score sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    pub min: f64,
    pub max: f64,
    /// Index of the first occurrence of `max`.
    pub max_location: usize,
}

impl ScoreStats {
    /// `None` for an empty sequence.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let first = *values.first()?;
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        let mut min = first;
        let mut max = first;
        let mut max_location = 0;
        for (i, &v) in values.iter().enumerate().skip(1) {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
                max_location = i;
            }
        }

        Some(Self {
            count: values.len(),
            mean,
            std: variance.max(0.0).sqrt(),
            min,
            max,
            max_location,
        })
    }

    fn is_finite(&self) -> bool {
        self.mean.is_finite() && self.std.is_finite() && self.max.is_finite()
    }

    /// `std / mean`, or `None` when the mean is not positive.
    pub fn coefficient_of_variation(&self) -> Option<f64> {
        (self.mean > 0.0).then(|| self.std / self.mean)
    }
}

/// A pattern label with its confidence in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub pattern: DriftPattern,
    pub confidence: f64,
}

/// Applies [`DriftThresholds`] to score statistics and a trend.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternClassifier {
    thresholds: DriftThresholds,
}

impl PatternClassifier {
    pub fn new(thresholds: DriftThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &DriftThresholds {
        &self.thresholds
    }

    /// Classify a score distribution. Pure: the same inputs always give the
    /// same classification.
    pub fn classify(
        &self,
        stats: &ScoreStats,
        trend: &Trend,
        window_count: usize,
    ) -> Classification {
        let t = &self.thresholds;
        let sample_factor = self.sample_factor(window_count);

        if window_count < t.effective_min_windows()
            || stats.count == 0
            || !stats.is_finite()
            || !trend.slope.is_finite()
            || !trend.r_squared.is_finite()
        {
            return Classification {
                pattern: DriftPattern::Unknown,
                confidence: sample_factor.min(t.unknown_max_confidence).clamp(0.0, 1.0),
            };
        }

        let (pattern, strength) = self.match_rule(stats, trend);
        let mut confidence = strength * sample_factor;
        if window_count < t.recommended_windows {
            confidence = confidence.min(t.marginal_data_max_confidence);
        }

        Classification {
            pattern,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// First matching rule and its strength in `[0, 1]`.
    fn match_rule(&self, stats: &ScoreStats, trend: &Trend) -> (DriftPattern, f64) {
        let t = &self.thresholds;

        if let Some(cv) = stats.coefficient_of_variation() {
            if cv < t.uniform_cv_threshold && stats.mean < t.uniform_mean_threshold {
                let strength = 0.5 + 0.5 * (1.0 - cv / t.uniform_cv_threshold);
                return (DriftPattern::SuspiciouslyUniform, strength);
            }
        }

        if stats.max > t.spike_ratio * stats.mean && stats.max > t.spike_min_absolute {
            let strength = if stats.mean > 0.0 {
                ((stats.max / stats.mean) / (2.0 * t.spike_ratio)).min(1.0)
            } else {
                1.0
            };
            return (DriftPattern::SuddenSpike, strength);
        }

        if trend.slope.abs() > t.trend_slope_threshold
            && trend.r_squared > t.trend_r_squared_threshold
        {
            return (DriftPattern::GradualDrift, trend.r_squared);
        }

        (DriftPattern::Consistent, CONSISTENT_STRENGTH)
    }

    /// Fewer windows, less statistical power: scales linearly up to 1.0 at
    /// `confidence_min_windows`.
    fn sample_factor(&self, window_count: usize) -> f64 {
        let saturation = self.thresholds.confidence_min_windows.max(1) as f64;
        (window_count as f64 / saturation).min(1.0)
    }
}
