//! Kilgarriff's two-sample chi-squared over a shared word profile.
//!
//! For each profile word with observed counts `O_a`, `O_b` and window
//! totals `N_a`, `N_b`:
//!
//! ```text
//! E_a = (O_a + O_b) * N_a / (N_a + N_b)
//! E_b = (O_a + O_b) * N_b / (N_a + N_b)
//! χ²  = Σ (O_a - E_a)² / E_a + (O_b - E_b)² / E_b
//! ```
//!
//! Words with zero expected count are skipped. Each word's two terms are
//! added together before the running sum, which keeps the statistic
//! bit-for-bit symmetric in `a` and `b`.

use smallvec::SmallVec;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Maximum number of per-word contributions kept for reporting.
pub const TOP_CONTRIBUTORS: usize = 10;

/// One profile word's share of a chi-squared statistic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    /// Profile rank of the word.
    pub rank: usize,
    pub count_a: u32,
    pub count_b: u32,
    /// `(O_a - E_a)² / E_a + (O_b - E_b)² / E_b` for this word.
    pub value: f64,
}

/// Result of comparing two windows' count vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct ChiSquaredTest {
    pub statistic: f64,
    /// Contributing words minus one; zero when fewer than two words occur.
    pub degrees_of_freedom: usize,
    /// Upper-tail probability of `statistic`; `None` when df is zero.
    pub p_value: Option<f64>,
    /// Largest contributions, descending.
    pub top_contributors: SmallVec<[Contribution; TOP_CONTRIBUTORS]>,
}

/// Compare two count vectors indexed by profile rank.
///
/// `total_a` and `total_b` are the windows' full token counts, including
/// tokens outside the profile.
pub fn chi_squared(
    counts_a: &[u32],
    total_a: usize,
    counts_b: &[u32],
    total_b: usize,
) -> ChiSquaredTest {
    debug_assert_eq!(counts_a.len(), counts_b.len());

    let n_a = total_a as f64;
    let n_b = total_b as f64;
    let n = n_a + n_b;

    let mut statistic = 0.0;
    let mut contributing = 0usize;
    let mut contributions: Vec<Contribution> = Vec::new();

    if n > 0.0 {
        for (rank, (&o_a, &o_b)) in counts_a.iter().zip(counts_b).enumerate() {
            let combined = f64::from(o_a) + f64::from(o_b);
            if combined == 0.0 {
                continue;
            }
            contributing += 1;

            let e_a = combined * n_a / n;
            let e_b = combined * n_b / n;
            let value = cell_term(f64::from(o_a), e_a) + cell_term(f64::from(o_b), e_b);
            statistic += value;
            contributions.push(Contribution {
                rank,
                count_a: o_a,
                count_b: o_b,
                value,
            });
        }
    }

    contributions.sort_by(|x, y| y.value.total_cmp(&x.value).then(x.rank.cmp(&y.rank)));
    contributions.truncate(TOP_CONTRIBUTORS);

    let degrees_of_freedom = contributing.saturating_sub(1);
    ChiSquaredTest {
        statistic,
        degrees_of_freedom,
        p_value: p_value(statistic, degrees_of_freedom),
        top_contributors: contributions.into_iter().collect(),
    }
}

fn cell_term(observed: f64, expected: f64) -> f64 {
    if expected > 0.0 {
        (observed - expected).powi(2) / expected
    } else {
        0.0
    }
}

/// Survival function of the chi-squared distribution, guarded against
/// degenerate parameters.
fn p_value(statistic: f64, degrees_of_freedom: usize) -> Option<f64> {
    if degrees_of_freedom == 0 || !statistic.is_finite() {
        return None;
    }
    let dist = ChiSquared::new(degrees_of_freedom as f64).ok()?;
    let p = dist.sf(statistic);
    p.is_finite().then(|| p.clamp(0.0, 1.0))
}
