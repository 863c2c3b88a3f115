//! End-to-end drift analysis over synthetic documents.

use styledrift_analysis::drift::{
    analyze_drift, ComparisonMode, DriftAnalyzer, DriftOptions, DriftPattern, DriftResult,
    DriftStatus, DriftThresholds,
};
use styledrift_core::config::StyleDriftConfig;
use styledrift_core::errors::{AnalysisError, DriftErrorCode};

/// Deterministic pseudo-random text over `vocab`.
fn lcg_text(n: usize, vocab: &[String], seed: u64) -> Vec<String> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = (state.wrapping_mul(1_103_515_245).wrapping_add(12_345)) & 0x7FFF_FFFF;
            vocab[((state >> 16) as usize) % vocab.len()].clone()
        })
        .collect()
}

fn vocab(prefix: &str, size: usize) -> Vec<String> {
    (0..size).map(|i| format!("{prefix}{i}")).collect()
}

/// 5000 tokens of one vocabulary followed by 5000 of a disjoint one.
fn two_author_document() -> Vec<String> {
    let mut tokens = lcg_text(5000, &vocab("alpha", 50), 7);
    tokens.extend(lcg_text(5000, &vocab("omega", 50), 11));
    tokens
}

/// Seven 1000-token segments; each swaps more of a 50-word vocabulary for
/// a single filler word than the one before.
fn narrowing_document() -> Vec<String> {
    let words = vocab("word", 50);
    let mut tokens = Vec::new();
    for m in [0usize, 1, 3, 6, 10, 15, 19] {
        tokens.extend(std::iter::repeat("the".to_string()).take(50 * m));
        for _ in 0..(20 - m) {
            tokens.extend(words.iter().cloned());
        }
    }
    tokens
}

/// A paragraph of `len` tokens repeated out to 10 000 tokens.
fn repeated_paragraph_of(len: usize) -> Vec<String> {
    let paragraph: Vec<String> = (0..len).map(|i| format!("w{}", i % 37)).collect();
    paragraph.iter().cycle().take(10_000).cloned().collect()
}

/// The period divides window size and stride, so every window holds the
/// same counts.
fn repeated_paragraph() -> Vec<String> {
    repeated_paragraph_of(100)
}

#[test]
fn test_repeated_paragraph_is_consistent() {
    let tokens = repeated_paragraph();
    let result = analyze_drift(&tokens, 1000, 500, ComparisonMode::Sequential, 500).unwrap();

    assert_eq!(result.status, DriftStatus::Ok);
    assert_eq!(result.window_count, 19);
    assert_eq!(result.pairwise_scores.len(), 18);
    assert!(result.chi_squared_values().iter().all(|&v| v == 0.0));
    assert_eq!(result.pattern, Some(DriftPattern::Consistent));
    assert!((result.pattern_confidence - 0.8).abs() < 1e-12);
    assert_eq!(result.overlap_ratio, 0.5);
}

#[test]
fn test_misaligned_repetition_is_suspiciously_uniform() {
    let tokens = repeated_paragraph_of(101);
    let result = analyze_drift(&tokens, 1000, 500, ComparisonMode::Sequential, 500).unwrap();

    assert_eq!(result.window_count, 19);
    let values = result.chi_squared_values();
    assert!(values.iter().all(|&v| v > 0.0 && v < 1.0), "{values:?}");
    assert!(result.std_chi_squared / result.mean_chi_squared < 0.15);
    assert_eq!(result.pattern, Some(DriftPattern::SuspiciouslyUniform));
    assert!(result.pattern_confidence > 0.5);
}

#[test]
fn test_author_change_is_sudden_spike() {
    let tokens = two_author_document();
    let result = analyze_drift(&tokens, 1000, 500, ComparisonMode::Sequential, 500).unwrap();

    assert_eq!(result.window_count, 19);
    assert_eq!(result.pattern, Some(DriftPattern::SuddenSpike));
    let max_location = result.max_location.unwrap();
    assert!(max_location == 8 || max_location == 9, "max at {max_location}");
    assert!(result.max_chi_squared > 600.0);
    assert!(result.max_chi_squared > 2.5 * result.mean_chi_squared);

    let pair = result.max_pair().unwrap();
    assert_eq!(pair.window_b, pair.window_a + 1);
    assert!(pair.p_value.unwrap() < 1e-6);
    assert!(!pair.top_words.is_empty());
    assert!(pair.top_words.len() <= 10);
    let contributions: Vec<f64> = pair.top_words.iter().map(|w| w.contribution).collect();
    assert!(contributions.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_fixed_lag_pairs_disjoint_windows() {
    let tokens = two_author_document();
    let options = DriftOptions {
        comparison_mode: ComparisonMode::FixedLag,
        lag: 2,
        ..DriftOptions::default()
    };
    let result = DriftAnalyzer::new(options, DriftThresholds::default())
        .unwrap()
        .analyze(&tokens)
        .unwrap();

    assert_eq!(result.pairwise_scores.len(), 17);
    for score in &result.pairwise_scores {
        assert_eq!(score.window_b - score.window_a, 2);
    }
    assert_eq!(result.max_location, Some(8));
    assert_eq!(result.pattern, Some(DriftPattern::SuddenSpike));
    assert_eq!(result.metadata.lag, Some(2));
}

#[test]
fn test_narrowing_vocabulary_is_gradual_drift() {
    let tokens = narrowing_document();
    let result = analyze_drift(&tokens, 1000, 1000, ComparisonMode::Sequential, 500).unwrap();

    assert_eq!(result.window_count, 7);
    assert_eq!(result.overlap_ratio, 0.0);
    assert_eq!(result.status, DriftStatus::Ok);
    let values = result.chi_squared_values();
    assert!(values.windows(2).all(|w| w[0] < w[1]), "{values:?}");
    assert!((result.trend - 22.287).abs() < 0.01, "slope {}", result.trend);
    assert!((result.trend_r_squared - 0.894).abs() < 0.001);
    assert_eq!(result.pattern, Some(DriftPattern::GradualDrift));
    // r² scaled by 7 of 10 windows.
    assert!((result.pattern_confidence - 0.894 * 0.7).abs() < 0.001);
}

#[test]
fn test_all_pairs_distance_matrix() {
    let tokens = two_author_document();
    let result = analyze_drift(&tokens, 1000, 500, ComparisonMode::AllPairs, 500).unwrap();
    let n = result.window_count;

    assert_eq!(result.pairwise_scores.len(), n * (n - 1) / 2);
    assert_eq!(result.trend, 0.0);
    assert_eq!(result.trend_r_squared, 0.0);

    let matrix = result.distance_matrix.as_ref().unwrap();
    assert_eq!(matrix.len(), n);
    for i in 0..n {
        assert_eq!(matrix[i].len(), n);
        assert_eq!(matrix[i][i], 0.0);
        for j in 0..n {
            assert_eq!(matrix[i][j], matrix[j][i]);
        }
    }
    for score in &result.pairwise_scores {
        assert_eq!(matrix[score.window_a][score.window_b], score.chi_squared);
    }
}

#[test]
fn test_sequential_has_no_distance_matrix() {
    let tokens = repeated_paragraph();
    let result = analyze_drift(&tokens, 1000, 500, ComparisonMode::Sequential, 500).unwrap();
    assert!(result.distance_matrix.is_none());
}

#[test]
fn test_short_text_is_insufficient() {
    let tokens: Vec<String> = repeated_paragraph().into_iter().take(1500).collect();
    let result = analyze_drift(&tokens, 1000, 500, ComparisonMode::Sequential, 500).unwrap();

    assert_eq!(result.window_count, 2);
    assert_eq!(result.status, DriftStatus::InsufficientData);
    assert!(!result.is_classified());
    assert!(result.status_message.contains("stride"));

    let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
    assert_eq!(json["status"], "insufficient_data");
    assert!(json["mean_chi_squared"].is_null());
    assert!(json["pattern"].is_null());
}

#[test]
fn test_insufficient_result_survives_json_round_trip() {
    let tokens: Vec<String> = repeated_paragraph().into_iter().take(1500).collect();
    let result = analyze_drift(&tokens, 1000, 500, ComparisonMode::Sequential, 500).unwrap();

    let restored: DriftResult = serde_json::from_str(&result.to_json().unwrap()).unwrap();
    assert_eq!(restored.status, DriftStatus::InsufficientData);
    assert!(restored.mean_chi_squared.is_nan());
    assert!(restored.std_chi_squared.is_nan());
    assert!(restored.min_chi_squared.is_nan());
    assert!(restored.max_chi_squared.is_nan());
    assert_eq!(restored.pattern, None);
    assert_eq!(restored.max_location, None);
    assert_eq!(restored.metadata, result.metadata);
}

#[test]
fn test_classified_result_survives_json_round_trip() {
    let tokens = two_author_document();
    let result = analyze_drift(&tokens, 1000, 500, ComparisonMode::AllPairs, 500).unwrap();
    let restored: DriftResult = serde_json::from_str(&result.to_json().unwrap()).unwrap();
    assert_eq!(restored.pattern, result.pattern);
    assert_eq!(restored.max_location, result.max_location);
    assert_eq!(restored.pairwise_scores.len(), result.pairwise_scores.len());
    assert!((restored.mean_chi_squared - result.mean_chi_squared).abs() < 1e-9);
    assert_eq!(restored.distance_matrix.map(|m| m.len()), Some(result.window_count));
}

#[test]
fn test_marginal_status_between_min_and_recommended() {
    let tokens: Vec<String> = repeated_paragraph().into_iter().take(2500).collect();
    let result = analyze_drift(&tokens, 1000, 500, ComparisonMode::Sequential, 500).unwrap();

    assert_eq!(result.window_count, 4);
    assert_eq!(result.status, DriftStatus::MarginalData);
    assert!(result.is_classified());
    assert!(result.pattern_confidence <= 0.6);
}

#[test]
fn test_invalid_inputs_are_errors() {
    let tokens = repeated_paragraph();
    let err = analyze_drift(&tokens, 0, 500, ComparisonMode::Sequential, 500).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_WINDOW_SIZE");

    let err = analyze_drift(&tokens, 1000, 0, ComparisonMode::Sequential, 500).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidStride(0)));

    let err = analyze_drift(&tokens, 1000, 500, ComparisonMode::Sequential, 0).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidWordCount(0)));

    let err = "bogus".parse::<ComparisonMode>().unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidComparisonMode { .. }));
}

#[test]
fn test_metadata_and_threshold_echo() {
    let tokens = repeated_paragraph();
    let result = analyze_drift(&tokens, 1000, 500, ComparisonMode::Sequential, 20).unwrap();

    assert_eq!(result.metadata.total_tokens, 10_000);
    assert_eq!(result.metadata.tokens_per_window, 1000);
    assert_eq!(result.metadata.comparisons_made, 18);
    assert_eq!(result.metadata.profile_size, 20);
    assert_eq!(result.metadata.method, "kilgarriff_chi_squared_2001");
    assert_eq!(result.thresholds, DriftThresholds::default());
}

#[test]
fn test_config_driven_analyzer() {
    styledrift_core::tracing::init_tracing();
    let config = StyleDriftConfig::from_toml(
        r#"
[analysis]
window_size = 500
stride = 500
comparison_mode = "all_pairs"

[thresholds]
spike_ratio = 3.0
"#,
    )
    .unwrap();
    let analyzer = DriftAnalyzer::from_config(&config).unwrap();
    let result = analyzer.analyze(&two_author_document()).unwrap();

    assert_eq!(result.window_count, 20);
    assert_eq!(result.comparison_mode, ComparisonMode::AllPairs);
    assert_eq!(result.thresholds.spike_ratio, 3.0);
    assert_eq!(result.pairwise_scores.len(), 190);
}

#[test]
fn test_analysis_is_deterministic() {
    let tokens = two_author_document();
    let a = analyze_drift(&tokens, 1000, 500, ComparisonMode::AllPairs, 500).unwrap();
    let b = analyze_drift(&tokens, 1000, 500, ComparisonMode::AllPairs, 500).unwrap();
    assert_eq!(a, b);
}
