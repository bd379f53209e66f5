//! Observed-vs-simulated comparison figures.
//!
//! [`ComparisonPlot::assemble`] turns one station's series into everything a
//! figure needs (masked observed curve, year ticks, NS annotation, y range).
//! Drawing is behind [`PlotRenderer`] so the pipeline can run headless;
//! [`PngRenderer`] draws with plotters.

use anyhow::Result as AnyResult;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to draw {}: {message}", path.display())]
    Draw { path: PathBuf, message: String },
}

/// One labelled tick on the time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    /// Day offset from the range start.
    pub position: f64,
    pub label: String,
}

/// Year ticks for an `n_days` axis running from `start_year` to `end_year`.
///
/// Spans over five years get a tick every fifth year, shorter spans one per
/// year plus a closing tick. Positions are spread evenly over `[0, n_days]`.
pub fn year_ticks(start_year: i32, end_year: i32, n_days: usize) -> Vec<AxisTick> {
    let span = (end_year - start_year).max(0) as usize;
    let (step, count) = if span > 5 {
        (5, (span + 2).div_ceil(5))
    } else {
        (1, span + 2)
    };

    let last = n_days as f64;
    (0..count)
        .map(|i| {
            let position = if count > 1 {
                last * i as f64 / (count - 1) as f64
            } else {
                0.0
            };
            AxisTick {
                position,
                label: (start_year + (i * step) as i32).to_string(),
            }
        })
        .collect()
}

/// `NS: 0.85`, or `NS: n/a` when nothing could be scored.
pub fn ns_label(ns: Option<f64>) -> String {
    match ns {
        Some(v) => format!("NS: {v:4.2}"),
        None => "NS: n/a".to_string(),
    }
}

/// Everything needed to draw one station's figure.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonPlot {
    /// Negative or non-finite observations are `None` and drawn as gaps.
    pub observed: Vec<Option<f64>>,
    pub simulated: Vec<f64>,
    pub ns_label: String,
    pub x_ticks: Vec<AxisTick>,
    pub y_range: (f64, f64),
}

impl ComparisonPlot {
    pub fn assemble(
        observed: &[f64],
        simulated: &[f64],
        ns: Option<f64>,
        start_year: i32,
        end_year: i32,
    ) -> Self {
        let observed: Vec<Option<f64>> = observed
            .iter()
            .map(|&v| (v.is_finite() && v >= 0.0).then_some(v))
            .collect();

        let (lo, hi) = observed
            .iter()
            .flatten()
            .chain(simulated.iter().filter(|v| v.is_finite()))
            .fold((0.0_f64, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let hi = if hi.is_finite() && hi > lo {
            hi + (hi - lo) * 0.05
        } else {
            lo + 1.0
        };

        Self {
            x_ticks: year_ticks(start_year, end_year, simulated.len()),
            observed,
            simulated: simulated.to_vec(),
            ns_label: ns_label(ns),
            y_range: (lo, hi),
        }
    }

    pub fn n_days(&self) -> usize {
        self.simulated.len()
    }

    /// Contiguous runs of valid observations as `(day, value)` points.
    pub fn observed_segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for (day, v) in self.observed.iter().enumerate() {
            match v {
                Some(v) => current.push((day as f64, *v)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}

/// Writes a [`ComparisonPlot`] to `path`.
pub trait PlotRenderer: Send + Sync {
    fn render(&self, plot: &ComparisonPlot, path: &Path) -> Result<(), RenderError>;
}

/// PNG output through the plotters bitmap backend.
#[derive(Debug, Clone, Copy)]
pub struct PngRenderer {
    pub width: u32,
    pub height: u32,
}

impl PngRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl PlotRenderer for PngRenderer {
    fn render(&self, plot: &ComparisonPlot, path: &Path) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        draw_comparison(root, plot, self.height as f64 / 480.0).map_err(|e| RenderError::Draw {
            path: path.to_path_buf(),
            message: format!("{e:#}"),
        })
    }
}

fn font(size: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal)
}

/// Draw onto any plotters backend. `scale` multiplies font sizes and
/// margins so large bitmaps keep readable proportions.
pub fn draw_comparison<DB>(
    root: DrawingArea<DB, plotters::coord::Shift>,
    plot: &ComparisonPlot,
    scale: f64,
) -> AnyResult<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let px = |v: f64| (v * scale).round() as u32;
    root.fill(&WHITE)?;

    let x_max = plot.n_days() as f64 + 1.0;
    let (y_min, y_max) = plot.y_range;

    let mut chart = ChartBuilder::on(&root)
        .margin(px(12.0))
        .set_label_area_size(LabelAreaPosition::Left, px(60.0))
        .set_label_area_size(LabelAreaPosition::Bottom, px(30.0))
        .build_cartesian_2d(0.0..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(0)
        .y_label_formatter(&|v| format!("{v:.1e}"))
        .y_desc("discharge (m3/s)")
        .label_style(font(10.0 * scale))
        .axis_desc_style(font(10.0 * scale))
        .draw()?;

    let observed_style = BLACK.stroke_width(px(1.5).max(1));
    let simulated_style = BLUE.stroke_width(px(1.0).max(1));

    // Legend entry first, then one unlabelled path per gap-free run.
    chart
        .draw_series(LineSeries::new(std::iter::empty::<(f64, f64)>(), observed_style))?
        .label("Observed")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], observed_style));
    for segment in plot.observed_segments() {
        chart.draw_series(LineSeries::new(segment, observed_style))?;
    }

    chart
        .draw_series(LineSeries::new(
            plot.simulated
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_finite())
                .map(|(day, v)| (day as f64, *v)),
            simulated_style,
        ))?
        .label("Simulated")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], simulated_style));

    // Year ticks sit at evenly spaced day offsets, so they are drawn by hand.
    let tick_style = TextStyle::from(font(10.0 * scale)).pos(Pos::new(HPos::Center, VPos::Top));
    for tick in &plot.x_ticks {
        let (x, y) = chart.backend_coord(&(tick.position, y_min));
        let len = px(5.0) as i32;
        root.draw(&PathElement::new(vec![(x, y), (x, y + len)], BLACK))?;
        root.draw(&Text::new(tick.label.clone(), (x, y + len + 2), tick_style.clone()))?;
    }

    let (x, y) = chart.backend_coord(&(0.0, y_max));
    let ns_style = TextStyle::from(font(10.0 * scale)).pos(Pos::new(HPos::Left, VPos::Center));
    root.draw(&Text::new(
        plot.ns_label.clone(),
        (x + px(8.0) as i32, y + px(12.0) as i32),
        ns_style,
    ))?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.7))
        .border_style(&BLACK.mix(0.3))
        .label_font(font(10.0 * scale))
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_span_gets_yearly_ticks_plus_closing_year() {
        let ticks = year_ticks(2000, 2001, 731);
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["2000", "2001", "2002"]);
        assert_eq!(ticks[0].position, 0.0);
        assert_eq!(ticks[1].position, 365.5);
        assert_eq!(ticks[2].position, 731.0);
    }

    #[test]
    fn long_span_ticks_every_five_years() {
        let ticks = year_ticks(1990, 2009, 7305);
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        // ceil((19 + 2) / 5) = 5
        assert_eq!(labels, ["1990", "1995", "2000", "2005", "2010"]);
        assert_eq!(ticks.last().unwrap().position, 7305.0);
    }

    #[test]
    fn six_year_span_switches_to_five_year_step() {
        let ticks = year_ticks(2000, 2006, 2557);
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[1].label, "2005");
    }

    #[test]
    fn single_year_has_two_ticks() {
        let ticks = year_ticks(2000, 2000, 366);
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[1].label, "2001");
        assert_eq!(ticks[1].position, 366.0);
    }

    #[test]
    fn ns_label_formats_two_decimals() {
        assert_eq!(ns_label(Some(0.8512)), "NS: 0.85");
        assert_eq!(ns_label(Some(-1.234)), "NS: -1.23");
        assert_eq!(ns_label(None), "NS: n/a");
    }

    #[test]
    fn negative_observations_become_gaps() {
        let obs = [1.0, 2.0, -9900.0, -9900.0, 0.0, 3.0, -9999.0];
        let sim = [1.0; 7];
        let plot = ComparisonPlot::assemble(&obs, &sim, Some(0.5), 2000, 2000);

        assert_eq!(plot.observed[2], None);
        assert_eq!(plot.observed[4], Some(0.0));
        assert_eq!(
            plot.observed_segments(),
            vec![vec![(0.0, 1.0), (1.0, 2.0)], vec![(4.0, 0.0), (5.0, 3.0)]]
        );
    }

    #[test]
    fn all_missing_observations_have_no_segments() {
        let obs = [-9999.0; 4];
        let sim = [5.0, 6.0, 7.0, 8.0];
        let plot = ComparisonPlot::assemble(&obs, &sim, None, 2000, 2000);
        assert!(plot.observed_segments().is_empty());
        assert_eq!(plot.ns_label, "NS: n/a");
    }

    #[test]
    fn y_range_starts_at_zero_and_covers_both_curves() {
        let obs = [10.0, 40.0, -9900.0];
        let sim = [20.0, 30.0, 100.0];
        let plot = ComparisonPlot::assemble(&obs, &sim, None, 2000, 2000);
        assert_eq!(plot.y_range.0, 0.0);
        assert!(plot.y_range.1 >= 100.0);
    }

    #[test]
    fn flat_zero_series_still_has_a_usable_range() {
        let plot = ComparisonPlot::assemble(&[0.0; 3], &[0.0; 3], None, 2000, 2000);
        assert!(plot.y_range.1 > plot.y_range.0);
    }

    #[test]
    fn png_renderer_writes_figure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Amazon-OBIDOS.png");
        let obs: Vec<f64> = (0..730)
            .map(|d| if d % 90 < 5 { -9900.0 } else { 100.0 + (d % 50) as f64 })
            .collect();
        let sim: Vec<f64> = (0..730).map(|d| 110.0 + (d % 40) as f64).collect();
        let plot = ComparisonPlot::assemble(&obs, &sim, Some(0.42), 2000, 2001);

        PngRenderer::new(800, 600).render(&plot, &path).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
