//! Nash–Sutcliffe efficiency.
//!
//! `NS = 1 - Σ(s - o)² / (Σ(o - mean(o))² + ε)` over the timesteps whose
//! observed value is strictly positive. 1.0 is a perfect match; the score is
//! unbounded below.

use serde::{Deserialize, Serialize};

/// Added to the denominator so a flat observed series does not divide by zero.
pub const NS_EPSILON: f64 = 1e-20;

/// Score plus the number of timesteps it was computed over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NsScore {
    pub value: f64,
    pub scored: usize,
}

/// Nash–Sutcliffe efficiency of `simulated` against `observed`.
///
/// Timesteps where the observation is non-positive, NaN, or one of the
/// missing-data sentinels (all negative) are excluded from both series.
/// Returns `None` when no timestep survives, or the lengths differ.
pub fn nash_sutcliffe(simulated: &[f64], observed: &[f64]) -> Option<NsScore> {
    if simulated.len() != observed.len() {
        return None;
    }

    let (s, o): (Vec<f64>, Vec<f64>) = simulated
        .iter()
        .zip(observed)
        .filter(|(_, o)| **o > 0.0)
        .map(|(&s, &o)| (s, o))
        .unzip();

    if o.is_empty() {
        return None;
    }

    let mean_o = super::mean(&o);
    let residual: f64 = s.iter().zip(&o).map(|(s, o)| (s - o).powi(2)).sum();
    let spread: f64 = o.iter().map(|o| (o - mean_o).powi(2)).sum();

    Some(NsScore {
        value: 1.0 - residual / (spread + NS_EPSILON),
        scored: o.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_series_score_one() {
        let o = [1.0, 4.0, 2.5, 8.0];
        let ns = nash_sutcliffe(&o, &o).unwrap();
        assert_eq!(ns.value, 1.0);
        assert_eq!(ns.scored, 4);
    }

    #[test]
    fn predicting_the_mean_scores_zero() {
        let o = [2.0, 4.0, 6.0];
        let s = [4.0, 4.0, 4.0];
        let ns = nash_sutcliffe(&s, &o).unwrap();
        assert!(ns.value.abs() < 1e-12);
    }

    #[test]
    fn non_positive_observations_are_skipped() {
        let o = [2.0, -9900.0, 4.0, 0.0, 6.0, -9999.0];
        let s = [2.0, 500.0, 4.0, 77.0, 6.0, 1.0];
        let ns = nash_sutcliffe(&s, &o).unwrap();
        assert_eq!(ns.scored, 3);
        assert_eq!(ns.value, 1.0);
    }

    #[test]
    fn no_valid_observations_has_no_score() {
        let o = [-9999.0; 5];
        let s = [1.0; 5];
        assert_eq!(nash_sutcliffe(&s, &o), None);
    }

    #[test]
    fn nan_observations_are_skipped() {
        let o = [f64::NAN, 3.0, 5.0];
        let s = [100.0, 3.0, 5.0];
        assert_eq!(nash_sutcliffe(&s, &o).unwrap().value, 1.0);
    }

    #[test]
    fn poor_simulation_scores_negative() {
        let o = [1.0, 2.0, 3.0];
        let s = [30.0, 20.0, 10.0];
        assert!(nash_sutcliffe(&s, &o).unwrap().value < 0.0);
    }

    #[test]
    fn length_mismatch_has_no_score() {
        assert_eq!(nash_sutcliffe(&[1.0], &[1.0, 2.0]), None);
    }
}
