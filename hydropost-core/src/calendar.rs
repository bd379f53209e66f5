//! Daily calendar arithmetic for simulation and observation series.
//!
//! A [`DateRange`] is inclusive on both ends. Every per-station series spans
//! exactly `range.len()` days, and simulation grids are stored one file per
//! calendar year, so the range is cut into per-year [`YearWindow`]s.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RangeError {
    #[error("start date {start} is after end date {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of daily records in one year's simulation file.
pub fn days_in_year(year: i32) -> usize {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Inclusive daily date range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Total number of days, both ends included.
    pub fn len(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Position of `date` in the daily series, if it falls inside the range.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        if self.contains(date) {
            Some((date - self.start).num_days() as usize)
        } else {
            None
        }
    }

    pub fn date_at(&self, index: usize) -> NaiveDate {
        self.start + Duration::days(index as i64)
    }

    pub fn start_year(&self) -> i32 {
        self.start.year()
    }

    pub fn end_year(&self) -> i32 {
        self.end.year()
    }

    /// Calendar years touched by the range, in order.
    pub fn years(&self) -> Vec<i32> {
        (self.start.year()..=self.end.year()).collect()
    }

    /// Where `year` lands in the global series and which days of that
    /// year's grid file feed it. `None` when the year lies outside the range.
    pub fn year_window(&self, year: i32) -> Option<YearWindow> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let last = NaiveDate::from_ymd_opt(year, 12, 31)?;
        let lo = first.max(self.start);
        let hi = last.min(self.end);
        if lo > hi {
            return None;
        }

        let series_start = (lo - self.start).num_days() as usize;
        let grid_start = lo.ordinal0() as usize;
        let len = ((hi - lo).num_days() + 1) as usize;

        Some(YearWindow {
            year,
            days_in_year: days_in_year(year),
            series: series_start..series_start + len,
            grid_days: grid_start..grid_start + len,
        })
    }

    /// All non-empty year windows, in calendar order.
    pub fn year_windows(&self) -> Vec<YearWindow> {
        self.years()
            .into_iter()
            .filter_map(|y| self.year_window(y))
            .collect()
    }
}

/// The slice of one calendar year that overlaps a [`DateRange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearWindow {
    pub year: i32,
    /// Length of the full year's grid file along the time axis (365 or 366).
    pub days_in_year: usize,
    /// Positions in the global series written by this year.
    pub series: Range<usize>,
    /// Day offsets inside the year's grid file read for this window.
    pub grid_days: Range<usize>,
}

impl YearWindow {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
