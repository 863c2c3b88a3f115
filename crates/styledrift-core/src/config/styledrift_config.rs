//! Top-level styledrift configuration with 4-layer resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AnalysisConfig, ThresholdConfig};
use crate::errors::ConfigError;

/// Project config file name, looked up in the analysis root.
pub const PROJECT_CONFIG_FILE: &str = "styledrift.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`STYLEDRIFT_*`)
/// 3. Project config (`styledrift.toml` in project root)
/// 4. User config (`~/.styledrift/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StyleDriftConfig {
    pub analysis: AnalysisConfig,
    pub thresholds: ThresholdConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub window_size: Option<usize>,
    pub stride: Option<usize>,
    pub comparison_mode: Option<String>,
    pub lag: Option<usize>,
    pub n_words: Option<usize>,
}

impl StyleDriftConfig {
    /// Load configuration with 4-layer resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(
                            path = %user_config_path.display(),
                            error = %e,
                            "ignoring unreadable user config"
                        );
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        tracing::debug!(?config, "resolved styledrift config");

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &StyleDriftConfig) -> Result<(), ConfigError> {
        let analysis = &config.analysis;
        for (field, value) in [
            ("analysis.window_size", analysis.window_size),
            ("analysis.stride", analysis.stride),
            ("analysis.lag", analysis.lag),
            ("analysis.n_words", analysis.n_words),
        ] {
            if value == Some(0) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Err(e) = analysis.effective_comparison_mode() {
            return Err(ConfigError::InvalidValue {
                field: "analysis.comparison_mode".to_string(),
                message: e.to_string(),
            });
        }

        let thresholds = &config.thresholds;
        for (field, value) in thresholds.unit_interval_fields() {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    return Err(ConfigError::ValidationFailed {
                        field: field.to_string(),
                        message: "must be between 0.0 and 1.0".to_string(),
                    });
                }
            }
        }
        for (field, value) in thresholds.positive_fields() {
            if let Some(v) = value {
                if !(v > 0.0 && v.is_finite()) {
                    return Err(ConfigError::ValidationFailed {
                        field: field.to_string(),
                        message: "must be a positive finite number".to_string(),
                    });
                }
            }
        }
        for (field, value) in thresholds.non_negative_fields() {
            if let Some(v) = value {
                if !(v >= 0.0 && v.is_finite()) {
                    return Err(ConfigError::ValidationFailed {
                        field: field.to_string(),
                        message: "must be a non-negative finite number".to_string(),
                    });
                }
            }
        }
        if let Some(min) = thresholds.min_windows {
            if min < 2 {
                return Err(ConfigError::ValidationFailed {
                    field: "thresholds.min_windows".to_string(),
                    message: format!("must be at least 2 to form a window pair, got {min}"),
                });
            }
        }
        if thresholds.confidence_min_windows == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "thresholds.confidence_min_windows".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let (Some(min), Some(recommended)) =
            (thresholds.min_windows, thresholds.recommended_windows)
        {
            if recommended < min {
                return Err(ConfigError::ValidationFailed {
                    field: "thresholds.recommended_windows".to_string(),
                    message: format!("must be at least min_windows ({min})"),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.styledrift/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut StyleDriftConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: StyleDriftConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; a field in `other` wins only when set.
    fn merge(base: &mut StyleDriftConfig, other: &StyleDriftConfig) {
        let (b, o) = (&mut base.analysis, &other.analysis);
        merge_field(&mut b.window_size, &o.window_size);
        merge_field(&mut b.stride, &o.stride);
        merge_field(&mut b.comparison_mode, &o.comparison_mode);
        merge_field(&mut b.lag, &o.lag);
        merge_field(&mut b.n_words, &o.n_words);
        merge_field(&mut b.parallel_threshold, &o.parallel_threshold);

        let (b, o) = (&mut base.thresholds, &other.thresholds);
        merge_field(&mut b.min_windows, &o.min_windows);
        merge_field(&mut b.recommended_windows, &o.recommended_windows);
        merge_field(&mut b.confidence_min_windows, &o.confidence_min_windows);
        merge_field(&mut b.marginal_data_max_confidence, &o.marginal_data_max_confidence);
        merge_field(&mut b.unknown_max_confidence, &o.unknown_max_confidence);
        merge_field(&mut b.spike_ratio, &o.spike_ratio);
        merge_field(&mut b.spike_min_absolute, &o.spike_min_absolute);
        merge_field(&mut b.uniform_cv_threshold, &o.uniform_cv_threshold);
        merge_field(&mut b.uniform_mean_threshold, &o.uniform_mean_threshold);
        merge_field(&mut b.trend_slope_threshold, &o.trend_slope_threshold);
        merge_field(&mut b.trend_r_squared_threshold, &o.trend_r_squared_threshold);
    }

    /// Apply environment variable overrides.
    /// Pattern: `STYLEDRIFT_WINDOW_SIZE`, `STYLEDRIFT_COMPARISON_MODE`, etc.
    /// Unparseable numbers are ignored.
    fn apply_env_overrides(config: &mut StyleDriftConfig) {
        if let Some(v) = env_parse::<usize>("STYLEDRIFT_WINDOW_SIZE") {
            config.analysis.window_size = Some(v);
        }
        if let Some(v) = env_parse::<usize>("STYLEDRIFT_STRIDE") {
            config.analysis.stride = Some(v);
        }
        if let Ok(val) = std::env::var("STYLEDRIFT_COMPARISON_MODE") {
            config.analysis.comparison_mode = Some(val);
        }
        if let Some(v) = env_parse::<usize>("STYLEDRIFT_LAG") {
            config.analysis.lag = Some(v);
        }
        if let Some(v) = env_parse::<usize>("STYLEDRIFT_N_WORDS") {
            config.analysis.n_words = Some(v);
        }
        if let Some(v) = env_parse::<f64>("STYLEDRIFT_SPIKE_RATIO") {
            config.thresholds.spike_ratio = Some(v);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut StyleDriftConfig, cli: &CliOverrides) {
        let analysis = &mut config.analysis;
        merge_field(&mut analysis.window_size, &cli.window_size);
        merge_field(&mut analysis.stride, &cli.stride);
        merge_field(&mut analysis.comparison_mode, &cli.comparison_mode);
        merge_field(&mut analysis.lag, &cli.lag);
        merge_field(&mut analysis.n_words, &cli.n_words);
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn merge_field<T: Clone>(base: &mut Option<T>, other: &Option<T>) {
    if other.is_some() {
        base.clone_from(other);
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Returns the user-level config directory: `~/.styledrift/`.
fn dirs_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".styledrift"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
