//! Return-period discharge estimator.
//!
//! For every dam site the annual-maximum series is screened, clamped at
//! zero, sorted, and fitted with a Gumbel distribution; the `T`-year quantile
//! becomes that site's value in the output binary. Sites whose series is
//! missing, constant, or whose estimate is not positive get NaN instead.

use hydropost_core::domain::AnnualMaxMatrix;
use hydropost_core::io::{count_dam_sites, read_annual_max, write_f32_file, DataError};
use hydropost_core::stats::{fit_gumbel, plotting_positions, GumbelError, GumbelFit};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, ReturnPeriodConfig};

#[derive(Debug, Error)]
pub enum ReturnPeriodError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("site {site}: {source}")]
    Fit {
        site: usize,
        #[source]
        source: GumbelError,
    },
}

/// Why a site did or did not receive an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteStatus {
    Estimated,
    /// Some value is NaN or at/above the missing-data threshold.
    MissingData,
    /// Every year has the same value.
    Constant,
    /// The fitted `T`-year quantile is zero or negative.
    NonPositive,
}

/// Outcome for one dam site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteEstimate {
    /// Zero-based row in the dam list.
    pub site: usize,
    pub status: SiteStatus,
    /// `T`-year discharge, NaN unless `status` is `Estimated`.
    pub value: f64,
    /// Present whenever a fit was attempted.
    pub fit: Option<GumbelFit>,
}

impl SiteEstimate {
    fn skipped(site: usize, status: SiteStatus) -> Self {
        Self {
            site,
            status,
            value: f64::NAN,
            fit: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == SiteStatus::Estimated
    }

    /// One-based dam identifier used in logs.
    pub fn dam_id(&self) -> usize {
        self.site + 1
    }
}

/// Fits one site's series at a fixed sample size and return period.
#[derive(Debug, Clone)]
pub struct SiteFitter {
    positions: Vec<f64>,
    return_period: f64,
    missing_threshold: f64,
}

impl SiteFitter {
    pub fn new(samples: usize, return_period: f64, alpha: f64, missing_threshold: f32) -> Self {
        Self {
            positions: plotting_positions(samples, alpha),
            return_period,
            missing_threshold: missing_threshold as f64,
        }
    }

    pub fn from_config(config: &ReturnPeriodConfig) -> Self {
        Self::new(
            config.samples(),
            config.return_period_years,
            config.plotting_alpha,
            config.missing_threshold,
        )
    }

    pub fn samples(&self) -> usize {
        self.positions.len()
    }

    /// Screen, clamp, sort, and fit one site's series.
    pub fn estimate(&self, site: usize, mut series: Vec<f64>) -> Result<SiteEstimate, GumbelError> {
        let (min, max) = series
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        if series.iter().any(|v| v.is_nan()) || max >= self.missing_threshold {
            return Ok(SiteEstimate::skipped(site, SiteStatus::MissingData));
        }
        if max == min {
            return Ok(SiteEstimate::skipped(site, SiteStatus::Constant));
        }

        for v in series.iter_mut() {
            if *v < 0.0 {
                *v = 0.0;
            }
        }
        series.sort_by(|a, b| a.total_cmp(b));

        let fit = fit_gumbel(&series, &self.positions, self.return_period)?;
        let (status, value) = if fit.estimate > 0.0 {
            (SiteStatus::Estimated, fit.estimate)
        } else {
            (SiteStatus::NonPositive, f64::NAN)
        };

        Ok(SiteEstimate {
            site,
            status,
            value,
            fit: Some(fit),
        })
    }
}

/// Estimate every site of the matrix, in site order.
pub fn estimate_sites(
    matrix: &AnnualMaxMatrix,
    fitter: &SiteFitter,
) -> Result<Vec<SiteEstimate>, ReturnPeriodError> {
    (0..matrix.sites())
        .map(|site| -> Result<SiteEstimate, ReturnPeriodError> {
            let est = fitter
                .estimate(site, matrix.site_series(site))
                .map_err(|source| ReturnPeriodError::Fit { site, source })?;
            match (&est.fit, est.status) {
                (Some(fit), _) => {
                    info!(
                        dam_id = est.dam_id(),
                        status = ?est.status,
                        "{:.0}yr discharge: {:.1}",
                        fit.return_period,
                        fit.estimate
                    );
                    debug!(dam_id = est.dam_id(), "fit parameters\n{}", fit.summary());
                }
                (None, status) => debug!(dam_id = est.dam_id(), ?status, "site skipped"),
            }
            Ok(est)
        })
        .collect()
}

/// Output array: one f32 per site, NaN for invalid sites.
pub fn output_values(estimates: &[SiteEstimate]) -> Vec<f32> {
    estimates.iter().map(|e| e.value as f32).collect()
}

/// Summary of a completed return-period run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnPeriodReport {
    pub return_period_years: f64,
    pub samples: usize,
    pub output: PathBuf,
    pub estimates: Vec<SiteEstimate>,
}

impl ReturnPeriodReport {
    pub fn estimated(&self) -> usize {
        self.estimates.iter().filter(|e| e.is_valid()).count()
    }

    pub fn count(&self, status: SiteStatus) -> usize {
        self.estimates.iter().filter(|e| e.status == status).count()
    }
}

/// Read the dam list and annual-maximum matrix, estimate every site, and
/// write the output binary. Nothing is written if any step fails.
pub fn run_return_period(config: &ReturnPeriodConfig) -> Result<ReturnPeriodReport, ReturnPeriodError> {
    config.validate()?;

    let dam_list = config.dam_list_path();
    let sites = count_dam_sites(&dam_list)?;
    info!(path = %dam_list.display(), sites, "read dam list");

    let samples = config.samples();
    let input = config.annual_max_path();
    let matrix = read_annual_max(&input, samples, sites)?;
    info!(path = %input.display(), samples, sites, "read annual maxima");

    let fitter = SiteFitter::from_config(config);
    let estimates = estimate_sites(&matrix, &fitter)?;

    let output = config.output_path();
    write_f32_file(&output, &output_values(&estimates))?;
    info!(path = %output.display(), "file outputted");

    Ok(ReturnPeriodReport {
        return_period_years: config.return_period_years,
        samples,
        output,
        estimates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitter(samples: usize) -> SiteFitter {
        SiteFitter::new(samples, 100.0, 0.0, 1e20)
    }

    #[test]
    fn constant_site_is_nan_among_valid_sites() {
        // 5 sites x 10 years; site 3 (index 2) is constant at 50.
        let columns: Vec<Vec<f32>> = (0..5)
            .map(|s| {
                if s == 2 {
                    vec![50.0; 10]
                } else {
                    (0..10)
                        .map(|y| 100.0 + (s as f32 + 1.0) * ((y * 7 % 10) as f32) * 13.0)
                        .collect()
                }
            })
            .collect();
        let matrix = AnnualMaxMatrix::from_columns(&columns).unwrap();

        let estimates = estimate_sites(&matrix, &fitter(10)).unwrap();
        let out = output_values(&estimates);

        assert_eq!(out.len(), 5);
        assert!(out[2].is_nan());
        assert_eq!(estimates[2].status, SiteStatus::Constant);
        for i in [0, 1, 3, 4] {
            assert!(out[i].is_finite() && out[i] > 0.0, "site {i}: {}", out[i]);
            assert_eq!(estimates[i].status, SiteStatus::Estimated);
        }
    }

    #[test]
    fn sentinel_value_marks_site_missing() {
        let mut series: Vec<f64> = (1..=10).map(|v| v as f64 * 10.0).collect();
        series[4] = 1e20_f32 as f64;
        let est = fitter(10).estimate(0, series).unwrap();
        assert_eq!(est.status, SiteStatus::MissingData);
        assert!(est.value.is_nan());
        assert!(est.fit.is_none());
    }

    #[test]
    fn nan_value_marks_site_missing() {
        let mut series: Vec<f64> = (1..=10).map(|v| v as f64).collect();
        series[0] = f64::NAN;
        let est = fitter(10).estimate(0, series).unwrap();
        assert_eq!(est.status, SiteStatus::MissingData);
    }

    #[test]
    fn negative_series_clamps_to_zero_and_is_non_positive() {
        let series: Vec<f64> = (1..=10).map(|v| -(v as f64)).collect();
        let est = fitter(10).estimate(0, series).unwrap();
        assert_eq!(est.status, SiteStatus::NonPositive);
        assert!(est.value.is_nan());
        let fit = est.fit.unwrap();
        assert_eq!(fit.scale, 0.0);
    }

    #[test]
    fn input_order_does_not_matter() {
        let a: Vec<f64> = vec![120.0, 80.0, 310.0, 95.0, 150.0, 210.0];
        let mut b = a.clone();
        b.reverse();
        let ea = fitter(6).estimate(0, a).unwrap();
        let eb = fitter(6).estimate(0, b).unwrap();
        assert_eq!(ea.value, eb.value);
    }

    #[test]
    fn infinite_return_period_is_a_fit_error() {
        let fitter = SiteFitter::new(10, f64::INFINITY, 0.0, 1e20);
        let series: Vec<f64> = (1..=10).map(|v| v as f64 * 10.0).collect();
        let err = fitter.estimate(0, series).unwrap_err();
        assert!(matches!(err, GumbelError::InvalidReturnPeriod(p) if p.is_infinite()));
    }

    #[test]
    fn fit_error_names_the_site() {
        // Fitter built for 4 samples but the series has 3.
        let matrix = AnnualMaxMatrix::new(3, 1, vec![1.0, 2.0, 3.0]).unwrap();
        let err = estimate_sites(&matrix, &fitter(4)).unwrap_err();
        assert!(matches!(err, ReturnPeriodError::Fit { site: 0, .. }));
    }
}
