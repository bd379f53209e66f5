//! Annual-maximum discharge matrix, shape (samples, sites), row-major.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("expected {expected} values ({rows} x {cols}), found {actual}")]
pub struct ShapeError {
    pub rows: usize,
    pub cols: usize,
    pub expected: usize,
    pub actual: usize,
}

/// Row `r` holds one annual-maximum sample for every site; column `s` is the
/// full series of site `s`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualMaxMatrix {
    samples: usize,
    sites: usize,
    values: Vec<f32>,
}

impl AnnualMaxMatrix {
    pub fn new(samples: usize, sites: usize, values: Vec<f32>) -> Result<Self, ShapeError> {
        let expected = samples * sites;
        if values.len() != expected {
            return Err(ShapeError {
                rows: samples,
                cols: sites,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            samples,
            sites,
            values,
        })
    }

    /// Build from per-site columns. All columns must share one length.
    pub fn from_columns(columns: &[Vec<f32>]) -> Result<Self, ShapeError> {
        let sites = columns.len();
        let samples = columns.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(samples * sites);
        for row in 0..samples {
            for col in columns {
                if let Some(v) = col.get(row) {
                    values.push(*v);
                }
            }
        }
        Self::new(samples, sites, values)
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn sites(&self) -> usize {
        self.sites
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// The series of one site, widened to f64, in file (time) order.
    pub fn site_series(&self, site: usize) -> Vec<f64> {
        assert!(site < self.sites, "site index {site} out of range");
        (0..self.samples)
            .map(|row| self.values[row * self.sites + site] as f64)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_read_across_rows() {
        // 3 samples x 2 sites
        let m = AnnualMaxMatrix::new(3, 2, vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0]).unwrap();
        assert_eq!(m.site_series(0), vec![1.0, 2.0, 3.0]);
        assert_eq!(m.site_series(1), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let err = AnnualMaxMatrix::new(4, 2, vec![0.0; 7]).unwrap_err();
        assert_eq!(err.expected, 8);
        assert_eq!(err.actual, 7);
    }

    #[test]
    fn from_columns_matches_row_major_layout() {
        let m = AnnualMaxMatrix::from_columns(&[vec![1.0, 2.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!(m.values(), &[1.0, 5.0, 2.0, 6.0]);
    }

    #[test]
    fn ragged_columns_are_rejected() {
        assert!(AnnualMaxMatrix::from_columns(&[vec![1.0, 2.0], vec![5.0]]).is_err());
    }
}
