//! Observed daily discharge at a gauge.
//!
//! One text file per station, `{obs_dir}/{station}.txt`: a fixed-length
//! header followed by `YYYY-MM-DD value` records in chronological order.
//! The loader lays the records onto the requested [`DateRange`], filling
//! days without a record with [`OBS_DAY_MISSING`] and a station without a
//! file with [`OBS_FILE_MISSING`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::DataError;
use crate::calendar::DateRange;
use crate::domain::{OBS_DAY_MISSING, OBS_FILE_MISSING};

/// Header length of the gauge files.
pub const OBS_HEADER_LINES: usize = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservedSource {
    File,
    MissingFile,
}

/// One value per day of the requested range.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedSeries {
    pub values: Vec<f64>,
    pub source: ObservedSource,
}

impl ObservedSeries {
    pub fn missing(range: &DateRange) -> Self {
        Self {
            values: vec![OBS_FILE_MISSING; range.len()],
            source: ObservedSource::MissingFile,
        }
    }

    /// Days holding an actual record.
    pub fn recorded_days(&self) -> usize {
        self.values
            .iter()
            .filter(|&&v| v != OBS_DAY_MISSING && v != OBS_FILE_MISSING)
            .count()
    }
}

pub fn observed_path(obs_dir: &Path, station: &str) -> PathBuf {
    obs_dir.join(format!("{station}.txt"))
}

/// Load a station's observations over `range`. A missing file is not an
/// error; it yields a series filled with [`OBS_FILE_MISSING`].
pub fn load_observed(
    path: &Path,
    range: &DateRange,
    header_lines: usize,
) -> Result<ObservedSeries, DataError> {
    if !path.exists() {
        return Ok(ObservedSeries::missing(range));
    }
    let file = File::open(path).map_err(|e| DataError::io(path, e))?;
    let values = parse_observed(BufReader::new(file), path, range, header_lines)?;
    Ok(ObservedSeries {
        values,
        source: ObservedSource::File,
    })
}

/// Lay `YYYY-MM-DD value` records onto `range`. Reading stops at the first
/// record dated after the range end.
pub fn parse_observed<R: BufRead>(
    reader: R,
    path: &Path,
    range: &DateRange,
    header_lines: usize,
) -> Result<Vec<f64>, DataError> {
    let mut values = vec![OBS_DAY_MISSING; range.len()];

    for (idx, line) in reader.lines().enumerate().skip(header_lines) {
        let lineno = idx + 1;
        let line = line.map_err(|e| DataError::io(path, e))?;
        let mut fields = line.split_whitespace();

        let Some(date_tok) = fields.next() else {
            continue;
        };
        let date = NaiveDate::parse_from_str(date_tok, "%Y-%m-%d").map_err(|e| {
            DataError::parse(path, lineno, format!("invalid date '{date_tok}': {e}"))
        })?;

        if date > range.end() {
            break;
        }
        let Some(pos) = range.index_of(date) else {
            continue;
        };

        let value_tok = fields
            .next()
            .ok_or_else(|| DataError::parse(path, lineno, "missing discharge value"))?;
        values[pos] = value_tok.parse::<f64>().map_err(|e| {
            DataError::parse(path, lineno, format!("invalid discharge '{value_tok}': {e}"))
        })?;
    }

    Ok(values)
}
