//! Serializable run configuration for both pipelines.
//!
//! Defaults reproduce the historical directory layout, so a bare
//! `HydropostConfig::default()` plus the command-line dates and tag is a
//! complete configuration. A TOML file can override any field:
//!
//! ```toml
//! [return_period]
//! base_dir = "/data/dams"
//! return_period_years = 50.0
//!
//! [validation]
//! sim_dir = "out"
//! execution = { type = "worker_pool", workers = 8 }
//! ```

use chrono::NaiveDate;
use hydropost_core::calendar::{DateRange, RangeError};
use hydropost_core::domain::{Station, MISSING_THRESHOLD};
use hydropost_core::io::OBS_HEADER_LINES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::execution::ExecutionStrategy;
use crate::extraction::SimulationFiles;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid date range: {0}")]
    Range(#[from] RangeError),

    #[error("end year {end} is before start year {start}")]
    YearsInverted { start: i32, end: i32 },

    #[error("return period must be finite and exceed 1 year, got {0}")]
    ReturnPeriod(f64),

    #[error("samples_per_year must be at least 1")]
    SamplesPerYear,

    #[error("plotting_alpha must lie in [0, 0.5), got {0}")]
    PlottingAlpha(f64),

    #[error("insufficient sample size: {samples} annual maxima, at least 2 are needed")]
    InsufficientSamples { samples: usize },

    #[error("dam tag must not be empty")]
    EmptyTag,
}

/// Top-level config file with one optional section per pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HydropostConfig {
    pub return_period: ReturnPeriodConfig,
    pub validation: ValidationConfig,
}

impl HydropostConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

// ─── Return period ──────────────────────────────────────────────────

/// Settings for the return-period discharge estimator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReturnPeriodConfig {
    /// Directory holding one sub-directory per dam tag.
    pub base_dir: PathBuf,
    pub tag: String,
    pub start_year: i32,
    pub end_year: i32,
    /// Target return period `T` in years.
    pub return_period_years: f64,
    /// Annual-maximum rows per year in the input matrix.
    pub samples_per_year: usize,
    /// Plotting-position parameter; 0 is Weibull.
    pub plotting_alpha: f64,
    /// Values at or above this mark a missing record.
    pub missing_threshold: f32,
}

impl Default for ReturnPeriodConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(".."),
            tag: String::new(),
            start_year: 2000,
            end_year: 2001,
            return_period_years: 100.0,
            samples_per_year: 1,
            plotting_alpha: 0.0,
            missing_threshold: MISSING_THRESHOLD,
        }
    }
}

impl ReturnPeriodConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tag.trim().is_empty() {
            return Err(ConfigError::EmptyTag);
        }
        if self.end_year < self.start_year {
            return Err(ConfigError::YearsInverted {
                start: self.start_year,
                end: self.end_year,
            });
        }
        if !self.return_period_years.is_finite() || self.return_period_years <= 1.0 {
            return Err(ConfigError::ReturnPeriod(self.return_period_years));
        }
        if self.samples_per_year == 0 {
            return Err(ConfigError::SamplesPerYear);
        }
        if !(0.0..0.5).contains(&self.plotting_alpha) {
            return Err(ConfigError::PlottingAlpha(self.plotting_alpha));
        }
        let samples = self.samples();
        if samples < 2 {
            return Err(ConfigError::InsufficientSamples { samples });
        }
        Ok(())
    }

    /// Rows of the annual-maximum matrix.
    pub fn samples(&self) -> usize {
        let years = (self.end_year - self.start_year + 1).max(0) as usize;
        years * self.samples_per_year
    }

    pub fn tag_dir(&self) -> PathBuf {
        self.base_dir.join(&self.tag)
    }

    pub fn dam_list_path(&self) -> PathBuf {
        self.tag_dir()
            .join(format!("damloc_modified_{}.csv", self.tag))
    }

    pub fn annual_max_path(&self) -> PathBuf {
        self.tag_dir().join("tmp_p01_AnnualMax.bin")
    }

    pub fn output_path(&self) -> PathBuf {
        self.tag_dir()
            .join(format!("tmp_p02_{}year.bin", period_label(self.return_period_years)))
    }
}

/// `100.0` → `"100"`, `2.5` → `"2.5"`.
fn period_label(years: f64) -> String {
    if years.fract() == 0.0 {
        format!("{years:.0}")
    } else {
        format!("{years}")
    }
}

// ─── Validation ─────────────────────────────────────────────────────

/// Pixel size of comparison figures.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FigureConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for FigureConfig {
    fn default() -> Self {
        // 6.4 x 4.8 in at 500 dpi
        Self {
            width: 3200,
            height: 2400,
        }
    }
}

/// Settings for the discharge validation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValidationConfig {
    /// First simulated day (inclusive).
    pub start: NaiveDate,
    /// Last simulated day (inclusive).
    pub end: NaiveDate,
    /// Directory of yearly simulation binaries.
    pub sim_dir: PathBuf,
    /// File-name prefix of the yearly binaries, `{prefix}{YYYY}.bin`.
    pub sim_prefix: String,
    pub map_params: PathBuf,
    pub station_list: PathBuf,
    pub obs_dir: PathBuf,
    pub obs_header_lines: usize,
    pub fig_dir: PathBuf,
    pub execution: ExecutionStrategy,
    /// Write one figure per station.
    pub render: bool,
    pub figure: FigureConfig,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2001, 12, 31).unwrap_or_default(),
            sim_dir: PathBuf::from("out"),
            sim_prefix: "outflw".to_string(),
            map_params: PathBuf::from("map/params.txt"),
            station_list: PathBuf::from("obs/discharge/discharge_list.txt"),
            obs_dir: PathBuf::from("obs/discharge"),
            obs_header_lines: OBS_HEADER_LINES,
            fig_dir: PathBuf::from("fig/discharge"),
            execution: ExecutionStrategy::Sequential,
            render: true,
            figure: FigureConfig::default(),
        }
    }
}

impl ValidationConfig {
    pub fn range(&self) -> Result<DateRange, ConfigError> {
        Ok(DateRange::new(self.start, self.end)?)
    }

    pub fn sim_files(&self) -> SimulationFiles {
        SimulationFiles::new(&self.sim_dir, self.sim_prefix.clone())
    }

    pub fn sim_path(&self, year: i32) -> PathBuf {
        self.sim_files().path_for(year)
    }

    pub fn figure_path(&self, station: &Station) -> PathBuf {
        self.fig_dir.join(format!("{}.png", station.file_stem()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydropost_core::domain::GridCell;

    fn rp(tag: &str, start: i32, end: i32) -> ReturnPeriodConfig {
        ReturnPeriodConfig {
            tag: tag.to_string(),
            start_year: start,
            end_year: end,
            ..ReturnPeriodConfig::default()
        }
    }

    #[test]
    fn return_period_paths_follow_tag_layout() {
        let cfg = rp("glb_15min", 1980, 2019);
        assert_eq!(
            cfg.dam_list_path(),
            PathBuf::from("../glb_15min/damloc_modified_glb_15min.csv")
        );
        assert_eq!(
            cfg.annual_max_path(),
            PathBuf::from("../glb_15min/tmp_p01_AnnualMax.bin")
        );
        assert_eq!(
            cfg.output_path(),
            PathBuf::from("../glb_15min/tmp_p02_100year.bin")
        );
        assert_eq!(cfg.samples(), 40);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn single_year_is_insufficient() {
        let cfg = rp("t", 2000, 2000);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InsufficientSamples { samples: 1 })
        ));

        // Two annual maxima per year make a single year usable.
        let cfg = ReturnPeriodConfig {
            samples_per_year: 2,
            ..cfg
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn bad_return_period_settings_are_rejected() {
        let base = rp("t", 2000, 2010);
        let c = ReturnPeriodConfig {
            return_period_years: 1.0,
            ..base.clone()
        };
        assert!(matches!(c.validate(), Err(ConfigError::ReturnPeriod(_))));

        let c = ReturnPeriodConfig {
            return_period_years: f64::INFINITY,
            ..base.clone()
        };
        assert!(matches!(c.validate(), Err(ConfigError::ReturnPeriod(_))));

        let c = ReturnPeriodConfig {
            plotting_alpha: 0.5,
            ..base.clone()
        };
        assert!(matches!(c.validate(), Err(ConfigError::PlottingAlpha(_))));

        assert!(matches!(
            rp("t", 2010, 2000).validate(),
            Err(ConfigError::YearsInverted { .. })
        ));
        assert!(matches!(rp(" ", 2000, 2010).validate(), Err(ConfigError::EmptyTag)));
    }

    #[test]
    fn fractional_period_keeps_its_decimals() {
        let cfg = ReturnPeriodConfig {
            return_period_years: 2.5,
            ..rp("t", 2000, 2010)
        };
        assert_eq!(cfg.output_path(), PathBuf::from("../t/tmp_p02_2.5year.bin"));
    }

    #[test]
    fn validation_paths_use_year_and_station_names() {
        let cfg = ValidationConfig::default();
        assert_eq!(cfg.sim_path(2003), PathBuf::from("out/outflw2003.bin"));

        let station = Station {
            river: "Mekong".into(),
            name: "PAKSE".into(),
            primary: GridCell { x: 0, y: 0 },
            secondary: None,
        };
        assert_eq!(
            cfg.figure_path(&station),
            PathBuf::from("fig/discharge/Mekong-PAKSE.png")
        );
        assert_eq!(cfg.range().unwrap().len(), 731);
    }

    #[test]
    fn toml_overrides_selected_fields() {
        let cfg = HydropostConfig::from_toml(
            r#"
[return_period]
base_dir = "/data/dams"
return_period_years = 50.0

[validation]
start = "1990-01-01"
end = "1999-12-31"
render = false
execution = { type = "worker_pool", workers = 8 }
"#,
        )
        .unwrap();

        assert_eq!(cfg.return_period.base_dir, PathBuf::from("/data/dams"));
        assert_eq!(cfg.return_period.return_period_years, 50.0);
        assert_eq!(cfg.return_period.samples_per_year, 1);

        assert!(!cfg.validation.render);
        assert_eq!(
            cfg.validation.execution,
            ExecutionStrategy::WorkerPool { workers: 8 }
        );
        assert_eq!(cfg.validation.sim_dir, PathBuf::from("out"));
        assert_eq!(cfg.validation.range().unwrap().len(), 3652);
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        assert_eq!(HydropostConfig::from_toml("").unwrap(), HydropostConfig::default());
    }

    #[test]
    fn unreadable_file_reports_path() {
        let err = HydropostConfig::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
