//! Hydropost CLI — post-processing for river-routing simulations.
//!
//! Commands:
//! - `return-period` — T-year discharge at every dam site from annual maxima
//! - `validate` — NS scores and comparison figures against gauge observations

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hydropost_runner::{
    run_return_period, run_validation, save_site_diagnostics, save_validation_report,
    ExecutionStrategy, HydropostConfig, PngRenderer, SiteStatus,
};

#[derive(Parser)]
#[command(
    name = "hydropost",
    version,
    about = "Hydropost — return-period estimation and discharge validation"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the T-year discharge at every dam site.
    ReturnPeriod {
        /// First year of the annual-maximum record.
        start_year: i32,
        /// Last year of the annual-maximum record.
        end_year: i32,
        /// Dam set tag; selects `{base_dir}/{tag}/`.
        tag: String,

        /// TOML config file with a `[return_period]` section.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory holding the tag directories. Defaults to `..`.
        #[arg(long)]
        base_dir: Option<PathBuf>,

        /// Return period in years. Defaults to 100.
        #[arg(long)]
        return_period: Option<f64>,

        /// Annual-maximum rows per year. Defaults to 1.
        #[arg(long)]
        samples_per_year: Option<usize>,

        /// Write per-site fit diagnostics to this CSV file.
        #[arg(long)]
        diagnostics: Option<PathBuf>,
    },
    /// Compare simulated and observed discharge at every gauge station.
    Validate {
        syear: i32,
        smon: u32,
        sday: u32,
        eyear: i32,
        emon: u32,
        eday: u32,

        /// TOML config file with a `[validation]` section.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Use a worker pool of this many threads.
        #[arg(long)]
        workers: Option<usize>,

        /// Skip writing figures.
        #[arg(long, default_value_t = false)]
        no_plot: bool,

        /// Write the station report as JSON here, plus a CSV next to it.
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Commands::ReturnPeriod {
            start_year,
            end_year,
            tag,
            config,
            base_dir,
            return_period,
            samples_per_year,
            diagnostics,
        } => run_return_period_cmd(
            start_year,
            end_year,
            tag,
            config,
            base_dir,
            return_period,
            samples_per_year,
            diagnostics,
        ),
        Commands::Validate {
            syear,
            smon,
            sday,
            eyear,
            emon,
            eday,
            config,
            workers,
            no_plot,
            report,
        } => {
            let start = NaiveDate::from_ymd_opt(syear, smon, sday)
                .with_context(|| format!("invalid start date {syear}-{smon}-{sday}"))?;
            let end = NaiveDate::from_ymd_opt(eyear, emon, eday)
                .with_context(|| format!("invalid end date {eyear}-{emon}-{eday}"))?;
            run_validate_cmd(start, end, config, workers, no_plot, report)
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<HydropostConfig> {
    match path {
        Some(path) => HydropostConfig::from_file(&path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(HydropostConfig::default()),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_return_period_cmd(
    start_year: i32,
    end_year: i32,
    tag: String,
    config_path: Option<PathBuf>,
    base_dir: Option<PathBuf>,
    return_period: Option<f64>,
    samples_per_year: Option<usize>,
    diagnostics: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(config_path)?.return_period;
    config.start_year = start_year;
    config.end_year = end_year;
    config.tag = tag;
    if let Some(dir) = base_dir {
        config.base_dir = dir;
    }
    if let Some(t) = return_period {
        config.return_period_years = t;
    }
    if let Some(k) = samples_per_year {
        config.samples_per_year = k;
    }

    let report = run_return_period(&config).context("return-period run failed")?;

    if let Some(path) = diagnostics {
        save_site_diagnostics(&report, &path)?;
        info!(path = %path.display(), "wrote fit diagnostics");
    }

    println!(
        "{} sites: {} estimated, {} missing data, {} constant, {} non-positive",
        report.estimates.len(),
        report.estimated(),
        report.count(SiteStatus::MissingData),
        report.count(SiteStatus::Constant),
        report.count(SiteStatus::NonPositive),
    );
    println!("Output: {}", report.output.display());
    Ok(())
}

fn run_validate_cmd(
    start: NaiveDate,
    end: NaiveDate,
    config_path: Option<PathBuf>,
    workers: Option<usize>,
    no_plot: bool,
    report_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(config_path)?.validation;
    config.start = start;
    config.end = end;
    if let Some(n) = workers {
        config.execution = ExecutionStrategy::worker_pool(n);
    }
    if no_plot {
        config.render = false;
    }

    let renderer = PngRenderer::new(config.figure.width, config.figure.height);
    let report = run_validation(&config, &renderer).context("validation run failed")?;

    if let Some(path) = report_path {
        save_validation_report(&report, &path)?;
        info!(path = %path.display(), "wrote validation report");
    }

    println!("{:<16} {:<24} {:>8} {:>8}", "river", "station", "NS", "days");
    for s in &report.stations {
        let ns = s.ns.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"));
        println!("{:<16} {:<24} {:>8} {:>8}", s.river, s.station, ns, s.scored_days);
    }
    println!(
        "{} of {} stations scored over {} days",
        report.scored(),
        report.stations.len(),
        report.days
    );
    Ok(())
}
