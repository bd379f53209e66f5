//! Property tests for the runner layer.
//!
//! Uses proptest to verify:
//! 1. Execution strategies — pool and sequential give identical ordered output
//! 2. Year ticks — span the whole axis with increasing year labels
//! 3. Plot assembly — gap segments cover exactly the non-negative observations
//! 4. Site screening — clamped sites never produce negative estimates

use hydropost_runner::{year_ticks, ComparisonPlot, ExecutionError, ExecutionStrategy, SiteFitter};
use proptest::prelude::*;

#[derive(Debug, PartialEq)]
struct PoolFailure;

impl From<ExecutionError> for PoolFailure {
    fn from(_: ExecutionError) -> Self {
        PoolFailure
    }
}

// ── Strategies (proptest) ────────────────────────────────────────────

/// Observations mixing valid values with both missing-data sentinels.
fn arb_observed() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        prop_oneof![
            3 => 0.0..5000.0_f64,
            1 => Just(-9900.0),
            1 => Just(-9999.0),
        ],
        0..300,
    )
}

// ── 1. Execution strategies ──────────────────────────────────────────

proptest! {
    #[test]
    fn pool_and_sequential_agree(count in 0usize..200, workers in 1usize..8, salt in any::<u64>()) {
        let f = |i: usize| -> Result<u64, PoolFailure> { Ok((i as u64).wrapping_mul(salt) ^ salt) };
        let seq = ExecutionStrategy::Sequential.map(count, f).unwrap();
        let par = ExecutionStrategy::worker_pool(workers).map(count, f).unwrap();
        prop_assert_eq!(seq, par);
    }
}

// ── 2. Year ticks ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn ticks_cover_axis_with_increasing_years(
        start in 1950i32..2050,
        span in 0i32..60,
        n_days in 1usize..40_000,
    ) {
        let ticks = year_ticks(start, start + span, n_days);
        prop_assert!(ticks.len() >= 2);
        prop_assert_eq!(ticks[0].position, 0.0);
        prop_assert_eq!(ticks[0].label.clone(), start.to_string());
        prop_assert!((ticks[ticks.len() - 1].position - n_days as f64).abs() < 1e-9);
        for pair in ticks.windows(2) {
            prop_assert!(pair[1].position > pair[0].position);
            let a: i32 = pair[0].label.parse().unwrap();
            let b: i32 = pair[1].label.parse().unwrap();
            prop_assert!(b > a);
        }
    }
}

// ── 3. Plot assembly ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn segments_hold_every_valid_observation_once(obs in arb_observed()) {
        let sim = vec![1.0; obs.len()];
        let plot = ComparisonPlot::assemble(&obs, &sim, None, 2000, 2001);

        let points: Vec<(f64, f64)> = plot.observed_segments().into_iter().flatten().collect();
        let expected: Vec<(f64, f64)> = obs
            .iter()
            .enumerate()
            .filter(|(_, v)| **v >= 0.0)
            .map(|(i, v)| (i as f64, *v))
            .collect();
        prop_assert_eq!(points, expected);

        for seg in plot.observed_segments() {
            prop_assert!(!seg.is_empty());
            for pair in seg.windows(2) {
                prop_assert_eq!(pair[1].0 - pair[0].0, 1.0);
            }
        }
    }
}

// ── 4. Site screening ────────────────────────────────────────────────

proptest! {
    #[test]
    fn valid_estimates_are_positive(series in prop::collection::vec(-500.0..5000.0_f64, 2..60)) {
        let fitter = SiteFitter::new(series.len(), 100.0, 0.0, 1e20);
        let est = fitter.estimate(0, series).unwrap();
        if est.is_valid() {
            prop_assert!(est.value > 0.0);
        } else {
            prop_assert!(est.value.is_nan());
        }
    }
}
