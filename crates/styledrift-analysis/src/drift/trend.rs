//! Ordinary least-squares trend over ordered scores.

use serde::{Deserialize, Serialize};

/// Slope and goodness of fit of a line through `(i, values[i])`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub slope: f64,
    pub r_squared: f64,
}

impl Trend {
    /// No trend could be fitted.
    pub const UNDEFINED: Trend = Trend {
        slope: 0.0,
        r_squared: 0.0,
    };

    /// A flat line that explains everything there is to explain.
    pub const FLAT: Trend = Trend {
        slope: 0.0,
        r_squared: 1.0,
    };
}

/// Fit `y = a + slope * x` with `x = 0..values.len()`.
///
/// - no values: `UNDEFINED`
/// - one value, or a constant series: `FLAT`
/// - two values: exact fit, `r_squared = 1.0`
/// - any non-finite value: `UNDEFINED`
///
/// `r_squared` is clamped to `[0, 1]`.
pub fn compute_trend(values: &[f64]) -> Trend {
    let n = values.len();
    if n == 0 || values.iter().any(|v| !v.is_finite()) {
        return Trend::UNDEFINED;
    }
    if n == 1 {
        return Trend::FLAT;
    }

    let n_f = n as f64;
    let mean_x = (n_f - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n_f;

    let mut s_xx = 0.0;
    let mut s_xy = 0.0;
    let mut s_yy = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        let dy = y - mean_y;
        s_xx += dx * dx;
        s_xy += dx * dy;
        s_yy += dy * dy;
    }

    let slope = s_xy / s_xx;
    if s_yy <= 0.0 {
        return Trend::FLAT;
    }
    if n == 2 {
        return Trend {
            slope,
            r_squared: 1.0,
        };
    }

    let r_squared = (s_xy * s_xy) / (s_xx * s_yy);
    Trend {
        slope,
        r_squared: if r_squared.is_finite() {
            r_squared.clamp(0.0, 1.0)
        } else {
            0.0
        },
    }
}
