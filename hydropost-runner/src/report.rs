//! Report export — JSON and CSV artifacts for both pipelines.
//!
//! - **Fit diagnostics** (CSV): one row per dam site with the Gumbel
//!   parameters and the `T`-year estimate
//! - **Validation report** (JSON + CSV): one entry per station with its NS
//!   score, scored days, observation status, and figure path
//!
//! Non-finite numbers are written as empty CSV cells and JSON `null`.

use std::path::Path;

use anyhow::{Context, Result};
use hydropost_core::io::ObservedSource;
use serde::Serialize;

use crate::return_period::{ReturnPeriodReport, SiteEstimate, SiteStatus};
use crate::validation::{StationReport, ValidationReport};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize any report to pretty JSON.
pub fn export_json<T: Serialize>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize report to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

fn status_name(status: SiteStatus) -> &'static str {
    match status {
        SiteStatus::Estimated => "estimated",
        SiteStatus::MissingData => "missing_data",
        SiteStatus::Constant => "constant",
        SiteStatus::NonPositive => "non_positive",
    }
}

fn cell(v: f64, precision: usize) -> String {
    if v.is_finite() {
        format!("{v:.precision$}")
    } else {
        String::new()
    }
}

/// Per-site fit diagnostics.
///
/// Columns: site, dam_id, status, a, c, r, n, estimate
pub fn export_sites_csv(estimates: &[SiteEstimate]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["site", "dam_id", "status", "a", "c", "r", "n", "estimate"])?;

    for e in estimates {
        let (a, c, r, n) = match &e.fit {
            Some(f) => (
                cell(f.scale, 6),
                cell(f.location, 6),
                cell(f.correlation, 6),
                f.n.to_string(),
            ),
            None => Default::default(),
        };
        wtr.write_record([
            e.site.to_string(),
            e.dam_id().to_string(),
            status_name(e.status).to_string(),
            a,
            c,
            r,
            n,
            cell(e.value, 3),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Per-station validation results.
///
/// Columns: river, station, ns, scored_days, observed, figure
pub fn export_stations_csv(stations: &[StationReport]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["river", "station", "ns", "scored_days", "observed", "figure"])?;

    for s in stations {
        let observed = match s.observed {
            ObservedSource::File => "file",
            ObservedSource::MissingFile => "missing_file",
        };
        wtr.write_record([
            s.river.clone(),
            s.station.clone(),
            s.ns.map_or_else(String::new, |v| cell(v, 4)),
            s.scored_days.to_string(),
            observed.to_string(),
            s.figure
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact files ─────────────────────────────────────────────────

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Write the fit diagnostics CSV for a return-period run.
pub fn save_site_diagnostics(report: &ReturnPeriodReport, path: &Path) -> Result<()> {
    write_file(path, &export_sites_csv(&report.estimates)?)
}

/// Write `path` as JSON and a sibling `.csv` with the station table.
pub fn save_validation_report(report: &ValidationReport, path: &Path) -> Result<()> {
    write_file(path, &export_json(report)?)?;
    write_file(&path.with_extension("csv"), &export_stations_csv(&report.stations)?)
}
