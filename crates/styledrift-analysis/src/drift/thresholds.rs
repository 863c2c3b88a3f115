//! Classification thresholds.
//!
//! One immutable value, built once and passed to the classifier, so tests
//! can inject synthetic threshold sets.

use serde::{Deserialize, Serialize};
use styledrift_core::config::ThresholdConfig;

/// Fewest windows that can ever be compared.
pub const MIN_WINDOWS_FLOOR: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftThresholds {
    /// Below this many windows no classification is attempted.
    pub min_windows: usize,
    /// At or above this many windows the data is not marginal.
    pub recommended_windows: usize,
    /// Window count at which confidence scaling reaches 1.0.
    pub confidence_min_windows: usize,
    pub marginal_data_max_confidence: f64,
    pub unknown_max_confidence: f64,
    /// A spike needs `max > spike_ratio * mean` ...
    pub spike_ratio: f64,
    /// ... and `max > spike_min_absolute`.
    pub spike_min_absolute: f64,
    /// Uniform needs `std / mean < uniform_cv_threshold` ...
    pub uniform_cv_threshold: f64,
    /// ... and `mean < uniform_mean_threshold`.
    pub uniform_mean_threshold: f64,
    pub trend_slope_threshold: f64,
    pub trend_r_squared_threshold: f64,
}

impl Default for DriftThresholds {
    fn default() -> Self {
        Self {
            min_windows: 3,
            recommended_windows: 5,
            confidence_min_windows: 10,
            marginal_data_max_confidence: 0.6,
            unknown_max_confidence: 0.0,
            spike_ratio: 2.5,
            spike_min_absolute: 50.0,
            uniform_cv_threshold: 0.15,
            uniform_mean_threshold: 10.0,
            trend_slope_threshold: 5.0,
            trend_r_squared_threshold: 0.5,
        }
    }
}

impl DriftThresholds {
    /// `min_windows`, raised to [`MIN_WINDOWS_FLOOR`].
    pub fn effective_min_windows(&self) -> usize {
        self.min_windows.max(MIN_WINDOWS_FLOOR)
    }

    /// Defaults overlaid with whatever the config sets.
    pub fn from_config(config: &ThresholdConfig) -> Self {
        let d = Self::default();
        Self {
            min_windows: config.min_windows.unwrap_or(d.min_windows),
            recommended_windows: config.recommended_windows.unwrap_or(d.recommended_windows),
            confidence_min_windows: config
                .confidence_min_windows
                .unwrap_or(d.confidence_min_windows),
            marginal_data_max_confidence: config
                .marginal_data_max_confidence
                .unwrap_or(d.marginal_data_max_confidence),
            unknown_max_confidence: config
                .unknown_max_confidence
                .unwrap_or(d.unknown_max_confidence),
            spike_ratio: config.spike_ratio.unwrap_or(d.spike_ratio),
            spike_min_absolute: config.spike_min_absolute.unwrap_or(d.spike_min_absolute),
            uniform_cv_threshold: config.uniform_cv_threshold.unwrap_or(d.uniform_cv_threshold),
            uniform_mean_threshold: config
                .uniform_mean_threshold
                .unwrap_or(d.uniform_mean_threshold),
            trend_slope_threshold: config
                .trend_slope_threshold
                .unwrap_or(d.trend_slope_threshold),
            trend_r_squared_threshold: config
                .trend_r_squared_threshold
                .unwrap_or(d.trend_r_squared_threshold),
        }
    }
}
