//! Discharge validation pipeline.
//!
//! Reads the grid parameters and station list, extracts every station's
//! simulated series, then scores and plots each station against its gauge
//! observations. A missing observation file only skips that station's score;
//! every other failure aborts the run.

use chrono::NaiveDate;
use hydropost_core::calendar::DateRange;
use hydropost_core::domain::Station;
use hydropost_core::io::{
    load_observed, observed_path, read_grid_params, read_station_list, DataError, ObservedSource,
};
use hydropost_core::stats::nash_sutcliffe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ConfigError, ValidationConfig};
use crate::execution::ExecutionError;
use crate::extraction::{extract_station_series, ExtractError};
use crate::plot::{ComparisonPlot, PlotRenderer, RenderError};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("failed to create {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result for one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReport {
    pub river: String,
    pub station: String,
    /// Nash–Sutcliffe efficiency, `None` when no day had a positive observation.
    pub ns: Option<f64>,
    pub scored_days: usize,
    pub observed: ObservedSource,
    pub figure: Option<PathBuf>,
}

/// Result of a whole validation run, stations in list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: usize,
    pub stations: Vec<StationReport>,
}

impl ValidationReport {
    pub fn station(&self, name: &str) -> Option<&StationReport> {
        self.stations.iter().find(|s| s.station == name)
    }

    /// Stations that received a score.
    pub fn scored(&self) -> usize {
        self.stations.iter().filter(|s| s.ns.is_some()).count()
    }
}

/// Run the validation pipeline. Figures are written only when
/// `config.render` is set.
pub fn run_validation(
    config: &ValidationConfig,
    renderer: &dyn PlotRenderer,
) -> Result<ValidationReport, ValidationError> {
    let range = config.range()?;
    let grid = read_grid_params(&config.map_params)?;
    info!(nx = grid.nx, ny = grid.ny, cell_size = grid.cell_size, "read grid parameters");

    let stations = read_station_list(&config.station_list)?;
    info!(path = %config.station_list.display(), stations = stations.len(), "read station list");

    let simulated = extract_station_series(
        &config.sim_files(),
        &grid,
        &range,
        &stations,
        config.execution,
    )?;

    if config.render {
        std::fs::create_dir_all(&config.fig_dir).map_err(|source| ValidationError::Io {
            path: config.fig_dir.clone(),
            source,
        })?;
    }

    let reports = config.execution.map(stations.len(), |i| {
        validate_station(config, &range, &stations[i], &simulated[i], renderer)
    })?;

    Ok(ValidationReport {
        start: range.start(),
        end: range.end(),
        days: range.len(),
        stations: reports,
    })
}

fn validate_station(
    config: &ValidationConfig,
    range: &DateRange,
    station: &Station,
    simulated: &[f64],
    renderer: &dyn PlotRenderer,
) -> Result<StationReport, ValidationError> {
    let path = observed_path(&config.obs_dir, &station.name);
    let observed = load_observed(&path, range, config.obs_header_lines)?;
    match observed.source {
        ObservedSource::File => info!(
            station = %station.name,
            path = %path.display(),
            recorded_days = observed.recorded_days(),
            "reading observation file"
        ),
        ObservedSource::MissingFile => {
            warn!(station = %station.name, path = %path.display(), "no observation file")
        }
    }

    let score = nash_sutcliffe(simulated, &observed.values);
    let ns = score.map(|s| s.value);

    let figure = if config.render {
        let plot = ComparisonPlot::assemble(
            &observed.values,
            simulated,
            ns,
            range.start_year(),
            range.end_year(),
        );
        let path = config.figure_path(station);
        renderer.render(&plot, &path)?;
        Some(path)
    } else {
        None
    };

    info!(
        river = %station.river,
        station = %station.name,
        ns = ?ns,
        figure = ?figure,
        "station validated"
    );

    Ok(StationReport {
        river: station.river.clone(),
        station: station.name.clone(),
        ns,
        scored_days: score.map_or(0, |s| s.scored),
        observed: observed.source,
        figure,
    })
}
