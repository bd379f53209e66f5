//! Flat binary arrays of little-endian 32-bit floats.

use std::fs;
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::Path;

use super::DataError;
use crate::domain::{AnnualMaxMatrix, GridCell, ShapeError};

const F32_BYTES: usize = std::mem::size_of::<f32>();

pub fn read_f32_file(path: &Path) -> Result<Vec<f32>, DataError> {
    let bytes = fs::read(path).map_err(|e| DataError::io(path, e))?;
    decode_f32(&bytes).ok_or_else(|| DataError::Truncated {
        path: path.to_path_buf(),
        len: bytes.len(),
    })
}

fn decode_f32(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.len() % F32_BYTES != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(F32_BYTES)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
    )
}

pub fn write_f32_file(path: &Path, values: &[f32]) -> Result<(), DataError> {
    let file = fs::File::create(path).map_err(|e| DataError::io(path, e))?;
    let mut out = BufWriter::new(file);
    for v in values {
        out.write_all(&v.to_le_bytes())
            .map_err(|e| DataError::io(path, e))?;
    }
    out.flush().map_err(|e| DataError::io(path, e))
}

/// Read the annual-maximum matrix, shape (samples, sites).
pub fn read_annual_max(
    path: &Path,
    samples: usize,
    sites: usize,
) -> Result<AnnualMaxMatrix, DataError> {
    let values = read_f32_file(path)?;
    AnnualMaxMatrix::new(samples, sites, values).map_err(|source| DataError::Shape {
        path: path.to_path_buf(),
        source,
    })
}

/// One year of simulated daily discharge, shape (days, ny, nx).
#[derive(Debug, Clone, PartialEq)]
pub struct YearGrid {
    days: usize,
    ny: usize,
    nx: usize,
    values: Vec<f32>,
}

impl YearGrid {
    pub fn new(days: usize, ny: usize, nx: usize, values: Vec<f32>) -> Result<Self, ShapeError> {
        let expected = days * ny * nx;
        if values.len() != expected {
            return Err(ShapeError {
                rows: days,
                cols: ny * nx,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            days,
            ny,
            nx,
            values,
        })
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn at(&self, day: usize, cell: GridCell) -> f32 {
        self.values[(day * self.ny + cell.y) * self.nx + cell.x]
    }

    /// Values of `cell` for the given day offsets.
    pub fn cell_series(&self, cell: GridCell, days: Range<usize>) -> Vec<f32> {
        days.map(|d| self.at(d, cell)).collect()
    }
}

pub fn read_year_grid(path: &Path, days: usize, ny: usize, nx: usize) -> Result<YearGrid, DataError> {
    let values = read_f32_file(path)?;
    YearGrid::new(days, ny, nx, values).map_err(|source| DataError::Shape {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f32_files_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vals.bin");
        let vals = [1.5_f32, -2.0, f32::NAN, 1e20];
        write_f32_file(&path, &vals).unwrap();

        assert_eq!(fs::metadata(&path).unwrap().len(), 16);
        let back = read_f32_file(&path).unwrap();
        assert_eq!(back[0], 1.5);
        assert_eq!(back[1], -2.0);
        assert!(back[2].is_nan());
        assert_eq!(back[3], 1e20);
    }

    #[test]
    fn odd_byte_count_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.bin");
        fs::write(&path, [0u8; 7]).unwrap();
        assert!(matches!(
            read_f32_file(&path),
            Err(DataError::Truncated { len: 7, .. })
        ));
    }

    #[test]
    fn annual_max_shape_is_checked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("amax.bin");
        write_f32_file(&path, &[1.0; 6]).unwrap();

        assert!(read_annual_max(&path, 3, 2).is_ok());
        assert!(matches!(
            read_annual_max(&path, 4, 2),
            Err(DataError::Shape { .. })
        ));
    }

    #[test]
    fn grid_indexing_is_day_then_y_then_x() {
        // 2 days, ny = 2, nx = 3; value encodes (d, y, x) as d*100 + y*10 + x
        let mut values = Vec::new();
        for d in 0..2 {
            for y in 0..2 {
                for x in 0..3 {
                    values.push((d * 100 + y * 10 + x) as f32);
                }
            }
        }
        let grid = YearGrid::new(2, 2, 3, values).unwrap();
        let cell = GridCell { x: 2, y: 1 };
        assert_eq!(grid.at(0, cell), 12.0);
        assert_eq!(grid.at(1, cell), 112.0);
        assert_eq!(grid.cell_series(cell, 0..2), vec![12.0, 112.0]);
    }
}
