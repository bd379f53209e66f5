//! Empirical non-exceedance probabilities for ranked samples.
//!
//! Rank `i` (1-based) of `n` gets `(i - alpha) / (n + 1 - 2 * alpha)`.
//! With `alpha = 0` this is the Weibull formula `i / (n + 1)`.

/// Weibull plotting-position parameter.
pub const WEIBULL_ALPHA: f64 = 0.0;

/// Plotting positions for ranks `1..=n`, strictly increasing inside (0, 1)
/// for any `alpha` in `[0, 1)`.
pub fn plotting_positions(n: usize, alpha: f64) -> Vec<f64> {
    let denom = n as f64 + 1.0 - 2.0 * alpha;
    (1..=n).map(|i| (i as f64 - alpha) / denom).collect()
}

pub fn weibull_plotting_positions(n: usize) -> Vec<f64> {
    plotting_positions(n, WEIBULL_ALPHA)
}
