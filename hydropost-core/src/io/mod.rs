//! Readers and writers for the pipelines' file formats.
//!
//! - Flat little-endian f32 binaries (annual-maximum matrix, yearly grids, results)
//! - Dam-site list (CSV)
//! - Grid parameter file (`params.txt`)
//! - Station list and per-station observed discharge text files

pub mod binary;
pub mod dam_list;
pub mod grid_params;
pub mod observed;
pub mod station_list;

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::ShapeError;

pub use binary::{read_annual_max, read_f32_file, read_year_grid, write_f32_file, YearGrid};
pub use dam_list::count_dam_sites;
pub use grid_params::{read_grid_params, GridParams};
pub use observed::{load_observed, observed_path, ObservedSeries, ObservedSource, OBS_HEADER_LINES};
pub use station_list::{parse_station_list, read_station_list};

/// Errors from reading or writing input and output files.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Shape {
        path: PathBuf,
        #[source]
        source: ShapeError,
    },

    #[error("{}: {len} bytes is not a whole number of f32 values", path.display())]
    Truncated { path: PathBuf, len: usize },

    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("{}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl DataError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// `line` is 1-based.
    pub(crate) fn parse(path: &Path, line: usize, message: impl Into<String>) -> Self {
        DataError::Parse {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }
}

/// First whitespace-separated token of a line, if any.
pub(crate) fn first_token(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}
