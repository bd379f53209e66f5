//! Statistics — pure functions over discharge samples and series.
//!
//! - Plotting positions for ranked samples
//! - Gumbel extreme-value fit by the method of L-moments
//! - Nash–Sutcliffe efficiency for simulated vs observed series

pub mod gumbel;
pub mod nash_sutcliffe;
pub mod plotting_position;

pub use gumbel::{
    fit_gumbel, gumbel_quantile, non_exceedance, GumbelError, GumbelFit, EULER_GAMMA,
};
pub use nash_sutcliffe::{nash_sutcliffe, NsScore, NS_EPSILON};
pub use plotting_position::{plotting_positions, weibull_plotting_positions, WEIBULL_ALPHA};

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Pearson correlation coefficient. NaN when either input has zero variance
/// or the lengths differ.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return f64::NAN;
    }
    let mx = mean(x);
    let my = mean(y);
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return f64::NAN;
    }
    sxy / (sxx.sqrt() * syy.sqrt())
}
