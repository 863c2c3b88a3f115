//! Fixed-size, fixed-stride windows over a token sequence.

use serde::{Deserialize, Serialize};
use styledrift_core::errors::AnalysisError;

/// A contiguous slice of the token sequence, `len` tokens from `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub index: usize,
    pub start: usize,
    pub len: usize,
}

impl Window {
    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// The window's tokens. `tokens` must be the sequence the window was
    /// built from.
    pub fn slice<'a, T>(&self, tokens: &'a [T]) -> &'a [T] {
        &tokens[self.start..self.end()]
    }

    /// True when the window spans token offset `offset`.
    pub fn contains(&self, offset: usize) -> bool {
        (self.start..self.end()).contains(&offset)
    }
}

/// Build windows starting at `0, stride, 2*stride, …`, each exactly
/// `window_size` long. A window that would run past `token_count` is
/// dropped, not padded, and ends the sequence.
pub fn build_windows(
    token_count: usize,
    window_size: usize,
    stride: usize,
) -> Result<Vec<Window>, AnalysisError> {
    if window_size == 0 {
        return Err(AnalysisError::InvalidWindowSize(window_size));
    }
    if stride == 0 {
        return Err(AnalysisError::InvalidStride(stride));
    }
    if token_count < window_size {
        return Ok(Vec::new());
    }

    let count = (token_count - window_size) / stride + 1;
    Ok((0..count)
        .map(|index| Window {
            index,
            start: index * stride,
            len: window_size,
        })
        .collect())
}

/// `(window_size - stride) / window_size`. Negative when windows leave gaps.
pub fn overlap_ratio(window_size: usize, stride: usize) -> f64 {
    if window_size == 0 {
        return 0.0;
    }
    (window_size as f64 - stride as f64) / window_size as f64
}
