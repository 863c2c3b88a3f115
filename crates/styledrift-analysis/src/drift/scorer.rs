//! Pairwise chi-squared scoring under a comparison mode.

use rayon::prelude::*;
use styledrift_core::errors::AnalysisError;
use styledrift_core::tracing::metrics;
use styledrift_core::types::ComparisonMode;

use super::chi_squared::{chi_squared, ChiSquaredTest};
use super::profile::WordProfile;
use super::types::{PairwiseScore, WordContribution};
use super::windows::Window;

/// Window-index pairs in generation order.
///
/// - sequential: `(0,1), (1,2), …`
/// - all_pairs: `(0,1), (0,2), …, (1,2), …` (row-major, `i < j`)
/// - fixed_lag: `(0,lag), (1,1+lag), …`
pub fn generate_pairs(mode: ComparisonMode, window_count: usize, lag: usize) -> Vec<(usize, usize)> {
    match mode {
        ComparisonMode::Sequential => (1..window_count).map(|j| (j - 1, j)).collect(),
        ComparisonMode::AllPairs => (0..window_count)
            .flat_map(|i| ((i + 1)..window_count).map(move |j| (i, j)))
            .collect(),
        ComparisonMode::FixedLag => {
            if lag == 0 {
                return Vec::new();
            }
            (lag..window_count).map(|j| (j - lag, j)).collect()
        }
    }
}

/// Scores window pairs against a shared [`WordProfile`].
pub struct PairwiseScorer<'p> {
    profile: &'p WordProfile,
    parallel_threshold: usize,
}

impl<'p> PairwiseScorer<'p> {
    /// `parallel_threshold`: pair count at which scoring moves onto the
    /// rayon pool. Output order never depends on it.
    pub fn new(profile: &'p WordProfile, parallel_threshold: usize) -> Self {
        Self {
            profile,
            parallel_threshold,
        }
    }

    /// Score the pairs `mode` generates over `windows`.
    ///
    /// Fails when a window runs past the end of `tokens`.
    pub fn score<T>(
        &self,
        tokens: &[T],
        windows: &[Window],
        mode: ComparisonMode,
        lag: usize,
    ) -> Result<Vec<PairwiseScore>, AnalysisError>
    where
        T: AsRef<str> + Sync,
    {
        if let Some(w) = windows.iter().find(|w| w.end() > tokens.len()) {
            return Err(AnalysisError::WindowOutOfRange {
                index: w.index,
                end: w.end(),
                token_count: tokens.len(),
            });
        }

        let pairs = generate_pairs(mode, windows.len(), lag);
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let parallel = pairs.len() >= self.parallel_threshold;
        let _span =
            tracing::debug_span!(metrics::SCORE_PAIRS_SPAN, pairs = pairs.len(), parallel).entered();

        let counts: Vec<Vec<u32>> = if parallel {
            windows
                .par_iter()
                .map(|w| self.profile.count_vector(w.slice(tokens)))
                .collect()
        } else {
            windows
                .iter()
                .map(|w| self.profile.count_vector(w.slice(tokens)))
                .collect()
        };

        let score_pair = |&(a, b): &(usize, usize)| {
            let test = chi_squared(&counts[a], windows[a].len, &counts[b], windows[b].len);
            self.to_score(&windows[a], &windows[b], test)
        };

        Ok(if parallel {
            pairs.par_iter().map(score_pair).collect()
        } else {
            pairs.iter().map(score_pair).collect()
        })
    }

    fn to_score(&self, a: &Window, b: &Window, test: ChiSquaredTest) -> PairwiseScore {
        let top_words = test
            .top_contributors
            .iter()
            .filter_map(|c| {
                self.profile.word(c.rank).map(|word| WordContribution {
                    word: word.to_string(),
                    count_a: c.count_a,
                    count_b: c.count_b,
                    contribution: c.value,
                })
            })
            .collect();

        PairwiseScore {
            window_a: a.index,
            window_b: b.index,
            chi_squared: test.statistic,
            degrees_of_freedom: test.degrees_of_freedom,
            p_value: test.p_value,
            top_words,
            window_a_size: a.len,
            window_b_size: b.len,
        }
    }
}

/// Square matrix of chi-squared values from `all_pairs` scores.
/// Unscored cells, including the diagonal, stay 0.0.
pub fn distance_matrix(scores: &[PairwiseScore], window_count: usize) -> Vec<Vec<f64>> {
    let mut matrix = vec![vec![0.0; window_count]; window_count];
    for s in scores {
        if s.window_a < window_count && s.window_b < window_count {
            matrix[s.window_a][s.window_b] = s.chi_squared;
            matrix[s.window_b][s.window_a] = s.chi_squared;
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drift::windows::build_windows;

    fn tokens(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_sequential_pairs() {
        assert_eq!(
            generate_pairs(ComparisonMode::Sequential, 4, 1),
            vec![(0, 1), (1, 2), (2, 3)]
        );
        assert!(generate_pairs(ComparisonMode::Sequential, 1, 1).is_empty());
    }

    #[test]
    fn test_all_pairs_row_major() {
        assert_eq!(
            generate_pairs(ComparisonMode::AllPairs, 4, 1),
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
    }

    #[test]
    fn test_fixed_lag_pairs() {
        assert_eq!(
            generate_pairs(ComparisonMode::FixedLag, 5, 2),
            vec![(0, 2), (1, 3), (2, 4)]
        );
        assert!(generate_pairs(ComparisonMode::FixedLag, 3, 3).is_empty());
        assert!(generate_pairs(ComparisonMode::FixedLag, 3, 0).is_empty());
    }

    #[test]
    fn test_pair_counts_match_mode() {
        for n in 0..8 {
            for mode in ComparisonMode::ALL {
                assert_eq!(generate_pairs(mode, n, 2).len(), mode.pair_count(n, 2));
            }
        }
    }

    #[test]
    fn test_repeated_text_scores_zero() {
        let toks = tokens(&"the cat sat on the mat ".repeat(8));
        let windows = build_windows(toks.len(), 12, 6).unwrap();
        let profile = WordProfile::build(&toks, 50);
        let scores = PairwiseScorer::new(&profile, usize::MAX).score(
            &toks,
            &windows,
            ComparisonMode::Sequential,
            1,
        )
        .unwrap();
        assert_eq!(scores.len(), windows.len() - 1);
        assert!(scores.iter().all(|s| s.chi_squared == 0.0));
    }

    #[test]
    fn test_disjoint_windows_name_their_words() {
        let toks = tokens("a a a a b b b b");
        let windows = build_windows(toks.len(), 4, 4).unwrap();
        let profile = WordProfile::build(&toks, 10);
        let scores = PairwiseScorer::new(&profile, usize::MAX).score(
            &toks,
            &windows,
            ComparisonMode::Sequential,
            1,
        )
        .unwrap();
        assert_eq!(scores.len(), 1);
        let s = &scores[0];
        assert!((s.chi_squared - 8.0).abs() < 1e-12);
        assert_eq!((s.window_a, s.window_b), (0, 1));
        assert_eq!((s.window_a_size, s.window_b_size), (4, 4));
        let words: Vec<&str> = s.top_words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, vec!["a", "b"]);
        assert_eq!((s.top_words[0].count_a, s.top_words[0].count_b), (4, 0));
    }

    #[test]
    fn test_parallel_matches_sequential_order() {
        let toks: Vec<String> = (0..400).map(|i| format!("w{}", (i * 7 + i / 13) % 23)).collect();
        let windows = build_windows(toks.len(), 40, 20).unwrap();
        let profile = WordProfile::build(&toks, 30);
        let serial = PairwiseScorer::new(&profile, usize::MAX).score(
            &toks,
            &windows,
            ComparisonMode::AllPairs,
            1,
        )
        .unwrap();
        let parallel = PairwiseScorer::new(&profile, 1)
            .score(&toks, &windows, ComparisonMode::AllPairs, 1)
            .unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_windows_past_the_tokens_are_rejected() {
        let toks = tokens("a b c d e f");
        let windows = build_windows(12, 4, 4).unwrap();
        let profile = WordProfile::build(&toks, 10);
        let err = PairwiseScorer::new(&profile, usize::MAX)
            .score(&toks, &windows, ComparisonMode::Sequential, 1)
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::WindowOutOfRange {
                index: 1,
                end: 8,
                token_count: 6
            }
        ));
    }

    #[test]
    fn test_distance_matrix_is_symmetric_with_zero_diagonal() {
        let toks: Vec<String> = (0..120).map(|i| format!("w{}", (i * i) % 11)).collect();
        let windows = build_windows(toks.len(), 30, 30).unwrap();
        let profile = WordProfile::build(&toks, 20);
        let scores = PairwiseScorer::new(&profile, usize::MAX).score(
            &toks,
            &windows,
            ComparisonMode::AllPairs,
            1,
        )
        .unwrap();
        let matrix = distance_matrix(&scores, windows.len());
        assert_eq!(matrix.len(), 4);
        for i in 0..4 {
            assert_eq!(matrix[i][i], 0.0);
            for j in 0..4 {
                assert_eq!(matrix[i][j], matrix[j][i]);
            }
        }
        assert_eq!(matrix[0][3], scores[2].chi_squared);
    }
}
