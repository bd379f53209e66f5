//! Station-series extraction from yearly simulation grids.
//!
//! Each year's grid file covers one [`YearWindow`] of the global series.
//! Years are read independently (sequentially or on a worker pool) and the
//! per-station slices are then copied into disjoint ranges of each series.

use hydropost_core::calendar::{DateRange, YearWindow};
use hydropost_core::domain::Station;
use hydropost_core::io::{read_year_grid, DataError, GridParams, YearGrid};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::execution::{ExecutionError, ExecutionStrategy};

/// Simulated daily discharge at one station over the whole date range.
pub type SimulatedSeries = Vec<f64>;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("station {station}: cell ({x}, {y}) lies outside the {nx} x {ny} grid")]
    CellOutOfGrid {
        station: String,
        /// 1-based, as written in the station list.
        x: usize,
        y: usize,
        nx: usize,
        ny: usize,
    },

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Location and naming of the yearly simulation binaries.
#[derive(Debug, Clone)]
pub struct SimulationFiles {
    pub dir: PathBuf,
    pub prefix: String,
}

impl SimulationFiles {
    pub fn new(dir: impl AsRef<Path>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            prefix: prefix.into(),
        }
    }

    pub fn path_for(&self, year: i32) -> PathBuf {
        self.dir.join(format!("{}{:04}.bin", self.prefix, year))
    }
}

/// Per-station values for one year window.
struct YearBlock {
    window: YearWindow,
    stations: Vec<Vec<f32>>,
}

/// Build the simulated series of every station, in station order.
pub fn extract_station_series(
    files: &SimulationFiles,
    grid: &GridParams,
    range: &DateRange,
    stations: &[Station],
    strategy: ExecutionStrategy,
) -> Result<Vec<SimulatedSeries>, ExtractError> {
    check_cells(grid, stations)?;

    let windows = range.year_windows();
    let blocks = strategy.map(windows.len(), |i| {
        read_year_block(files, grid, &windows[i], stations)
    })?;

    let mut series = vec![vec![0.0_f64; range.len()]; stations.len()];
    for block in blocks {
        for (out, values) in series.iter_mut().zip(&block.stations) {
            for (slot, v) in out[block.window.series.clone()].iter_mut().zip(values) {
                *slot = *v as f64;
            }
        }
    }
    Ok(series)
}

fn check_cells(grid: &GridParams, stations: &[Station]) -> Result<(), ExtractError> {
    for station in stations {
        for cell in station.cells() {
            if !cell.fits(grid.nx, grid.ny) {
                return Err(ExtractError::CellOutOfGrid {
                    station: station.name.clone(),
                    x: cell.x + 1,
                    y: cell.y + 1,
                    nx: grid.nx,
                    ny: grid.ny,
                });
            }
        }
    }
    Ok(())
}

fn read_year_block(
    files: &SimulationFiles,
    grid: &GridParams,
    window: &YearWindow,
    stations: &[Station],
) -> Result<YearBlock, ExtractError> {
    let path = files.path_for(window.year);
    info!(year = window.year, path = %path.display(), "reading simulation file");
    let year_grid = read_year_grid(&path, window.days_in_year, grid.ny, grid.nx)?;

    Ok(YearBlock {
        window: window.clone(),
        stations: stations
            .iter()
            .map(|s| station_values(&year_grid, window, s))
            .collect(),
    })
}

/// Primary cell values over the window, plus the secondary cell if present.
fn station_values(grid: &YearGrid, window: &YearWindow, station: &Station) -> Vec<f32> {
    let mut values = grid.cell_series(station.primary, window.grid_days.clone());
    if let Some(cell) = station.secondary {
        for (v, extra) in values
            .iter_mut()
            .zip(grid.cell_series(cell, window.grid_days.clone()))
        {
            *v += extra;
        }
    }
    values
}
