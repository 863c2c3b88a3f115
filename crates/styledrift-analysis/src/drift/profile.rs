//! Global most-frequent-word profile.
//!
//! Built once per document and shared read-only by every pairwise
//! comparison, so windows with different local vocabularies are scored
//! over the same feature basis.

use serde::Serialize;
use styledrift_core::types::collections::FxHashMap;

/// A word in the profile with its document-wide count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileEntry {
    pub word: String,
    pub count: u64,
}

/// The `n_words` most frequent words of a document, most frequent first.
#[derive(Debug, Clone, Default)]
pub struct WordProfile {
    entries: Vec<ProfileEntry>,
    index: FxHashMap<String, usize>,
}

impl WordProfile {
    /// Count every token and keep the `n_words` most frequent.
    ///
    /// Ties are broken by first occurrence in `tokens`, so the profile is
    /// deterministic for a given input.
    pub fn build<T: AsRef<str>>(tokens: &[T], n_words: usize) -> Self {
        // word -> (count, first occurrence)
        let mut counts: FxHashMap<&str, (u64, usize)> = FxHashMap::default();
        for (pos, token) in tokens.iter().enumerate() {
            counts.entry(token.as_ref()).or_insert((0, pos)).0 += 1;
        }

        let mut ranked: Vec<(&str, u64, usize)> = counts
            .into_iter()
            .map(|(word, (count, first))| (word, count, first))
            .collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked.truncate(n_words);

        let entries: Vec<ProfileEntry> = ranked
            .into_iter()
            .map(|(word, count, _)| ProfileEntry {
                word: word.to_string(),
                count,
            })
            .collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(rank, e)| (e.word.clone(), rank))
            .collect();

        Self { entries, index }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ProfileEntry] {
        &self.entries
    }

    /// Word at `rank` (0 = most frequent).
    pub fn word(&self, rank: usize) -> Option<&str> {
        self.entries.get(rank).map(|e| e.word.as_str())
    }

    /// Rank of `word`, or `None` when it is outside the profile.
    pub fn rank(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    /// Per-profile-word counts over `tokens`, indexed by rank. Tokens
    /// outside the profile are not counted.
    pub fn count_vector<T: AsRef<str>>(&self, tokens: &[T]) -> Vec<u32> {
        let mut counts = vec![0u32; self.entries.len()];
        for token in tokens {
            if let Some(rank) = self.rank(token.as_ref()) {
                counts[rank] += 1;
            }
        }
        counts
    }
}
