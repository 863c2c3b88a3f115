//! Classifier threshold overrides.
//!
//! Every field is optional; unset fields fall back to the compiled
//! defaults of the drift classifier.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Windows below which no classification is attempted.
    pub min_windows: Option<usize>,
    /// Windows at which confidence is no longer capped.
    pub recommended_windows: Option<usize>,
    /// Window count at which confidence scaling saturates.
    pub confidence_min_windows: Option<usize>,
    /// Confidence cap for marginal data.
    pub marginal_data_max_confidence: Option<f64>,
    /// Confidence cap for the `unknown` pattern.
    pub unknown_max_confidence: Option<f64>,
    /// Max-to-mean ratio for a spike.
    pub spike_ratio: Option<f64>,
    /// Absolute chi-squared floor for a spike.
    pub spike_min_absolute: Option<f64>,
    /// Coefficient of variation below which scores look templated.
    pub uniform_cv_threshold: Option<f64>,
    /// Mean chi-squared below which scores look templated.
    pub uniform_mean_threshold: Option<f64>,
    /// Minimum |slope| for gradual drift.
    pub trend_slope_threshold: Option<f64>,
    /// Minimum R² for gradual drift.
    pub trend_r_squared_threshold: Option<f64>,
}

impl ThresholdConfig {
    /// Fields holding probabilities or confidences that must lie in [0, 1].
    pub(crate) fn unit_interval_fields(&self) -> [(&'static str, Option<f64>); 3] {
        [
            ("thresholds.marginal_data_max_confidence", self.marginal_data_max_confidence),
            ("thresholds.unknown_max_confidence", self.unknown_max_confidence),
            ("thresholds.trend_r_squared_threshold", self.trend_r_squared_threshold),
        ]
    }

    /// Fields that must be strictly positive.
    pub(crate) fn positive_fields(&self) -> [(&'static str, Option<f64>); 3] {
        [
            ("thresholds.spike_ratio", self.spike_ratio),
            ("thresholds.uniform_cv_threshold", self.uniform_cv_threshold),
            ("thresholds.trend_slope_threshold", self.trend_slope_threshold),
        ]
    }

    /// Fields that must be non-negative.
    pub(crate) fn non_negative_fields(&self) -> [(&'static str, Option<f64>); 2] {
        [
            ("thresholds.spike_min_absolute", self.spike_min_absolute),
            ("thresholds.uniform_mean_threshold", self.uniform_mean_threshold),
        ]
    }
}
