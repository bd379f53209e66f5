//! Hydropost Runner — pipeline orchestration, configuration, plotting, reports.
//!
//! This crate builds on `hydropost-core` to provide:
//! - Return-period discharge estimation for every dam site
//! - Station-series extraction from yearly simulation grids
//! - Discharge validation (NS scoring and comparison figures)
//! - Sequential or worker-pool execution with identical results
//! - TOML configuration and JSON/CSV report export

pub mod config;
pub mod execution;
pub mod extraction;
pub mod plot;
pub mod report;
pub mod return_period;
pub mod validation;

pub use config::{ConfigError, FigureConfig, HydropostConfig, ReturnPeriodConfig, ValidationConfig};
pub use execution::{ExecutionError, ExecutionStrategy};
pub use extraction::{extract_station_series, ExtractError, SimulatedSeries, SimulationFiles};
pub use plot::{year_ticks, AxisTick, ComparisonPlot, PlotRenderer, PngRenderer, RenderError};
pub use report::{export_json, export_sites_csv, export_stations_csv, save_site_diagnostics, save_validation_report};
pub use return_period::{
    estimate_sites, output_values, run_return_period, ReturnPeriodError, ReturnPeriodReport,
    SiteEstimate, SiteFitter, SiteStatus,
};
pub use validation::{run_validation, StationReport, ValidationError, ValidationReport};
