//! Gumbel (EV1) fit by the method of L-moments.
//!
//! For an ascending sample `x` of size `n`:
//!
//! ```text
//! b0   = mean(x)
//! b1   = Σ j·x[j] / (n·(n-1)),   j = 0..n-1
//! lam1 = b0
//! lam2 = 2·b1 - b0
//! a    = lam2 / ln 2
//! c    = lam1 - 0.5772·a
//! Q(p) = c - a·ln(-ln p)
//! ```
//!
//! The `T`-year estimate is `Q(1 - 1/T)`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::{mean, pearson};

/// Euler–Mascheroni constant, truncated as in the standard L-moment tables.
pub const EULER_GAMMA: f64 = 0.5772;

#[derive(Debug, Error, PartialEq)]
pub enum GumbelError {
    #[error("insufficient sample size: need at least 2 values, got {n}")]
    InsufficientSample { n: usize },

    #[error("sample has {samples} values but {positions} plotting positions were given")]
    LengthMismatch { samples: usize, positions: usize },

    #[error("return period must be finite and greater than 1 year, got {0}")]
    InvalidReturnPeriod(f64),
}

/// Fitted Gumbel parameters plus diagnostics for one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GumbelFit {
    /// Scale parameter `a`.
    pub scale: f64,
    /// Location parameter `c`.
    pub location: f64,
    /// Pearson correlation between the sample and the fitted curve.
    pub correlation: f64,
    /// Sample size.
    pub n: usize,
    /// `Q(p)` at every sample plotting position.
    pub fitted: Vec<f64>,
    pub return_period: f64,
    /// `Q(1 - 1/T)`.
    pub estimate: f64,
}

impl GumbelFit {
    /// Quantile function `Q(p) = c - a·ln(-ln p)`.
    pub fn quantile(&self, p: f64) -> f64 {
        gumbel_quantile(self.scale, self.location, p)
    }

    /// Value expected to be reached once every `return_period` years.
    pub fn return_level(&self, return_period: f64) -> f64 {
        self.quantile(non_exceedance(return_period))
    }

    /// Multi-line parameter block, e.g. for a figure annotation.
    pub fn summary(&self) -> String {
        format!(
            "GUM\na={:8.3}\nc={:8.3}\nr={:8.3}\nn={:4}",
            self.scale, self.location, self.correlation, self.n
        )
    }
}

impl fmt::Display for GumbelFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "a={:.3} c={:.3} r={:.3} n={} Q({:.0}yr)={:.1}",
            self.scale, self.location, self.correlation, self.n, self.return_period, self.estimate
        )
    }
}

pub fn gumbel_quantile(scale: f64, location: f64, p: f64) -> f64 {
    location - scale * (-p.ln()).ln()
}

/// Non-exceedance probability of the `T`-year event.
pub fn non_exceedance(return_period: f64) -> f64 {
    1.0 - 1.0 / return_period
}

/// Fit a Gumbel distribution to an ascending `sorted` sample.
///
/// `positions` must hold one plotting position per sample value; they only
/// feed the fitted curve and the correlation diagnostic.
pub fn fit_gumbel(
    sorted: &[f64],
    positions: &[f64],
    return_period: f64,
) -> Result<GumbelFit, GumbelError> {
    let n = sorted.len();
    if n < 2 {
        return Err(GumbelError::InsufficientSample { n });
    }
    if positions.len() != n {
        return Err(GumbelError::LengthMismatch {
            samples: n,
            positions: positions.len(),
        });
    }
    if !return_period.is_finite() || return_period <= 1.0 {
        return Err(GumbelError::InvalidReturnPeriod(return_period));
    }

    let (scale, location) = l_moment_parameters(sorted);

    let fitted: Vec<f64> = positions
        .iter()
        .map(|&p| gumbel_quantile(scale, location, p))
        .collect();
    let correlation = pearson(sorted, &fitted);
    let estimate = gumbel_quantile(scale, location, non_exceedance(return_period));

    Ok(GumbelFit {
        scale,
        location,
        correlation,
        n,
        fitted,
        return_period,
        estimate,
    })
}

/// `(a, c)` from the first two sample L-moments. Caller guarantees `n >= 2`.
fn l_moment_parameters(sorted: &[f64]) -> (f64, f64) {
    let n = sorted.len() as f64;
    let b0 = mean(sorted);
    let b1 = sorted
        .iter()
        .enumerate()
        .map(|(j, x)| j as f64 * x)
        .sum::<f64>()
        / n
        / (n - 1.0);

    let lam1 = b0;
    let lam2 = 2.0 * b1 - b0;
    let scale = lam2 / std::f64::consts::LN_2;
    let location = lam1 - EULER_GAMMA * scale;
    (scale, location)
}
