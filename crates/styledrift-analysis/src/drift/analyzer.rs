//! Drift analysis orchestrator.
//!
//! Validates options, drives windows → profile → scoring → trend →
//! classification, and decides the data-sufficiency status.

use std::time::Instant;

use styledrift_core::config::analysis_config::{
    DEFAULT_LAG, DEFAULT_N_WORDS, DEFAULT_PARALLEL_THRESHOLD, DEFAULT_STRIDE, DEFAULT_WINDOW_SIZE,
};
use styledrift_core::config::{AnalysisConfig, StyleDriftConfig};
use styledrift_core::errors::AnalysisError;
use styledrift_core::tracing::metrics;
use styledrift_core::types::ComparisonMode;

use super::classifier::{PatternClassifier, ScoreStats};
use super::profile::WordProfile;
use super::scorer::{distance_matrix, PairwiseScorer};
use super::thresholds::DriftThresholds;
use super::trend::{compute_trend, Trend};
use super::types::{DriftMetadata, DriftResult, DriftStatus, PairwiseScore, METHOD};
use super::windows::{build_windows, overlap_ratio};

/// Windowing and scoring options for one analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriftOptions {
    pub window_size: usize,
    pub stride: usize,
    pub comparison_mode: ComparisonMode,
    /// Only read for `fixed_lag`.
    pub lag: usize,
    pub n_words: usize,
    pub parallel_threshold: usize,
}

impl Default for DriftOptions {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            stride: DEFAULT_STRIDE,
            comparison_mode: ComparisonMode::default(),
            lag: DEFAULT_LAG,
            n_words: DEFAULT_N_WORDS,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl DriftOptions {
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let options = Self {
            window_size: config.effective_window_size(),
            stride: config.effective_stride(),
            comparison_mode: config.effective_comparison_mode()?,
            lag: config.effective_lag(),
            n_words: config.effective_n_words(),
            parallel_threshold: config.effective_parallel_threshold(),
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.window_size == 0 {
            return Err(AnalysisError::InvalidWindowSize(self.window_size));
        }
        if self.stride == 0 {
            return Err(AnalysisError::InvalidStride(self.stride));
        }
        if self.n_words == 0 {
            return Err(AnalysisError::InvalidWordCount(self.n_words));
        }
        if self.comparison_mode == ComparisonMode::FixedLag && self.lag == 0 {
            return Err(AnalysisError::InvalidLag(self.lag));
        }
        Ok(())
    }
}

/// Runs drift analyses with fixed options and thresholds.
#[derive(Debug, Clone)]
pub struct DriftAnalyzer {
    options: DriftOptions,
    classifier: PatternClassifier,
}

impl DriftAnalyzer {
    pub fn new(options: DriftOptions, thresholds: DriftThresholds) -> Result<Self, AnalysisError> {
        options.validate()?;
        Ok(Self {
            options,
            classifier: PatternClassifier::new(thresholds),
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            options: DriftOptions::default(),
            classifier: PatternClassifier::default(),
        }
    }

    /// Build from a resolved config. The config should already have passed
    /// [`StyleDriftConfig::validate`]; option errors are still caught here.
    pub fn from_config(config: &StyleDriftConfig) -> Result<Self, AnalysisError> {
        let options = DriftOptions::from_config(&config.analysis)?;
        Self::new(options, DriftThresholds::from_config(&config.thresholds))
    }

    pub fn options(&self) -> &DriftOptions {
        &self.options
    }

    pub fn thresholds(&self) -> &DriftThresholds {
        self.classifier.thresholds()
    }

    /// Analyze a token sequence.
    ///
    /// Too little text is not an error: it yields a result with status
    /// `insufficient_data`.
    pub fn analyze<T>(&self, tokens: &[T]) -> Result<DriftResult, AnalysisError>
    where
        T: AsRef<str> + Sync,
    {
        let opts = &self.options;
        let _span = tracing::info_span!(
            metrics::ANALYZE_DRIFT_SPAN,
            tokens = tokens.len(),
            window_size = opts.window_size,
            stride = opts.stride,
            mode = opts.comparison_mode.name(),
        )
        .entered();
        let start = Instant::now();

        opts.validate()?;
        let windows = build_windows(tokens.len(), opts.window_size, opts.stride)?;
        let window_count = windows.len();
        let thresholds = *self.classifier.thresholds();
        tracing::debug!(window_count, "built windows");

        let min_windows = thresholds.effective_min_windows();
        if window_count < min_windows {
            let message = too_few_windows_message(window_count, tokens.len(), min_windows);
            tracing::warn!(window_count, "insufficient data for drift analysis");
            return Ok(self.insufficient(tokens.len(), window_count, 0, message));
        }

        let profile = WordProfile::build(tokens, opts.n_words);
        let scores = PairwiseScorer::new(&profile, opts.parallel_threshold).score(
            tokens,
            &windows,
            opts.comparison_mode,
            opts.lag,
        )?;

        let Some(stats) = ScoreStats::from_values(&chi_squared_values(&scores)) else {
            let message = match opts.comparison_mode {
                ComparisonMode::FixedLag => format!(
                    "lag {} leaves no window pairs among {window_count} windows. \
                     Use a lag below the window count.",
                    opts.lag,
                ),
                _ => too_few_windows_message(window_count, tokens.len(), min_windows),
            };
            tracing::warn!(
                window_count,
                mode = opts.comparison_mode.name(),
                "comparison produced no pairs"
            );
            return Ok(self.insufficient(tokens.len(), window_count, profile.len(), message));
        };

        let trend = if opts.comparison_mode.is_positional() {
            compute_trend(&chi_squared_values(&scores))
        } else {
            Trend::UNDEFINED
        };
        let classification = self.classifier.classify(&stats, &trend, window_count);

        let (status, status_message) = if window_count < thresholds.recommended_windows {
            tracing::warn!(window_count, "marginal data for drift analysis");
            (
                DriftStatus::MarginalData,
                format!(
                    "Only {window_count} windows; {} or more recommended. \
                     Confidence is capped at {}.",
                    thresholds.recommended_windows, thresholds.marginal_data_max_confidence,
                ),
            )
        } else {
            (DriftStatus::Ok, String::new())
        };

        let matrix = (opts.comparison_mode == ComparisonMode::AllPairs)
            .then(|| distance_matrix(&scores, window_count));

        tracing::info!(
            window_count,
            status = status.name(),
            pattern = classification.pattern.name(),
            confidence = classification.confidence,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "drift analysis complete"
        );

        Ok(DriftResult {
            status,
            status_message,
            pattern: Some(classification.pattern),
            pattern_confidence: classification.confidence,
            mean_chi_squared: stats.mean,
            std_chi_squared: stats.std,
            min_chi_squared: stats.min,
            max_chi_squared: stats.max,
            max_location: Some(stats.max_location),
            trend: trend.slope,
            trend_r_squared: trend.r_squared,
            window_size: opts.window_size,
            stride: opts.stride,
            window_count,
            overlap_ratio: overlap_ratio(opts.window_size, opts.stride),
            comparison_mode: opts.comparison_mode,
            metadata: self.metadata(tokens.len(), scores.len(), profile.len()),
            pairwise_scores: scores,
            distance_matrix: matrix,
            thresholds,
        })
    }

    fn insufficient(
        &self,
        total_tokens: usize,
        window_count: usize,
        profile_size: usize,
        status_message: String,
    ) -> DriftResult {
        let opts = &self.options;
        DriftResult {
            status: DriftStatus::InsufficientData,
            status_message,
            pattern: None,
            pattern_confidence: 0.0,
            mean_chi_squared: f64::NAN,
            std_chi_squared: f64::NAN,
            min_chi_squared: f64::NAN,
            max_chi_squared: f64::NAN,
            max_location: None,
            trend: 0.0,
            trend_r_squared: 0.0,
            window_size: opts.window_size,
            stride: opts.stride,
            window_count,
            overlap_ratio: overlap_ratio(opts.window_size, opts.stride),
            comparison_mode: opts.comparison_mode,
            pairwise_scores: Vec::new(),
            distance_matrix: None,
            thresholds: *self.classifier.thresholds(),
            metadata: self.metadata(total_tokens, 0, profile_size),
        }
    }

    fn metadata(&self, total_tokens: usize, comparisons: usize, profile_size: usize) -> DriftMetadata {
        let opts = &self.options;
        DriftMetadata {
            total_tokens,
            tokens_per_window: opts.window_size,
            comparisons_made: comparisons,
            profile_size,
            lag: (opts.comparison_mode == ComparisonMode::FixedLag).then_some(opts.lag),
            method: METHOD.to_string(),
        }
    }
}

impl Default for DriftAnalyzer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn too_few_windows_message(
    window_count: usize,
    total_tokens: usize,
    min_windows: usize,
) -> String {
    format!(
        "Only {window_count} windows from {total_tokens} tokens; at least {min_windows} are \
         needed. Try a smaller window_size or stride."
    )
}

fn chi_squared_values(scores: &[PairwiseScore]) -> Vec<f64> {
    scores.iter().map(|s| s.chi_squared).collect()
}

/// Analyze `tokens` with default thresholds.
///
/// Typical values: `window_size = 1000`, `stride = 500`,
/// `ComparisonMode::Sequential`, `n_words = 500`. For `fixed_lag` the lag
/// is 1; use [`DriftAnalyzer`] to set it.
pub fn analyze_drift<T>(
    tokens: &[T],
    window_size: usize,
    stride: usize,
    comparison_mode: ComparisonMode,
    n_words: usize,
) -> Result<DriftResult, AnalysisError>
where
    T: AsRef<str> + Sync,
{
    let options = DriftOptions {
        window_size,
        stride,
        comparison_mode,
        n_words,
        ..DriftOptions::default()
    };
    DriftAnalyzer::new(options, DriftThresholds::default())?.analyze(tokens)
}
