//! Diagnostic SVG plots of a detection run.

use crate::data::{DetectionTrace, InputSeries, PeakTable};
use log::{info, warn};
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

const PLOT_WIDTH: u32 = 1600;
const PLOT_HEIGHT: u32 = 600;

/// Errors raised by plot rendering.
#[derive(Debug)]
pub enum PlotError {
    /// Nothing finite to draw.
    EmptySeries,
    /// Output directory could not be created.
    Io(std::io::Error),
    /// The drawing backend failed.
    Drawing(String),
}

impl std::fmt::Display for PlotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlotError::EmptySeries => write!(f, "series has no finite values to plot"),
            PlotError::Io(err) => write!(f, "plot I/O failure: {}", err),
            PlotError::Drawing(msg) => write!(f, "plot drawing failure: {}", msg),
        }
    }
}

impl std::error::Error for PlotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlotError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PlotError {
    fn from(value: std::io::Error) -> Self {
        PlotError::Io(value)
    }
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(value: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Drawing(value.to_string())
    }
}

/// File name used for a series plot.
pub fn plot_file_name(series_id: &str) -> String {
    let stem: String = series_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{}_peaks.svg", stem)
}

/// Render the series with baseline, cutoff, masked regions and peaks.
///
/// Returns the path written.
pub fn render_detection(
    series: &InputSeries,
    trace: &DetectionTrace,
    table: &PeakTable,
    dir: &Path,
) -> Result<PathBuf, PlotError> {
    let (y_min, y_max) = value_range(series, trace).ok_or(PlotError::EmptySeries)?;
    let (t_min, t_max) = match (series.timestamps.first(), series.timestamps.last()) {
        (Some(&a), Some(&b)) if b > a => (a, b),
        (Some(&a), _) => (a - 0.5, a + 0.5),
        _ => return Err(PlotError::EmptySeries),
    };

    std::fs::create_dir_all(dir)?;
    let path = dir.join(plot_file_name(&series.id));
    draw(series, trace, table, &path, (t_min, t_max), (y_min, y_max))?;
    Ok(path)
}

fn draw(
    series: &InputSeries,
    trace: &DetectionTrace,
    table: &PeakTable,
    path: &Path,
    (t_min, t_max): (f64, f64),
    (y_min, y_max): (f64, f64),
) -> Result<(), PlotError> {
    let root = SVGBackend::new(path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{}: {} peaks", series.id, table.len()),
            ("sans-serif", 20),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(t_min..t_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Value")
        .draw()?;

    // Masked stretches as shaded bands.
    let shade = RGBColor(210, 210, 210).mix(0.5).filled();
    chart.draw_series(masked_runs(series).into_iter().map(|(a, b)| {
        Rectangle::new(
            [(series.timestamps[a], y_min), (series.timestamps[b], y_max)],
            shade,
        )
    }))?;

    chart
        .draw_series(LineSeries::new(
            finite_points(&series.timestamps, series.values.iter().copied()),
            &BLUE,
        ))?
        .label("series")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .draw_series(LineSeries::new(
            finite_points(
                &series.timestamps,
                (0..series.len()).map(|i| trace.baseline.at(i)),
            ),
            &BLACK,
        ))?
        .label("baseline")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLACK));

    if trace.cutoff.is_some() {
        chart
            .draw_series(LineSeries::new(
                finite_points(
                    &series.timestamps,
                    (0..series.len()).map(|i| trace.cutoff_level(i).unwrap_or(f64::NAN)),
                ),
                &GREEN,
            ))?
            .label("cutoff")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &GREEN));
    }

    chart.draw_series(trace.candidates.iter().map(|&i| {
        Circle::new(
            (series.timestamps[i], series.values[i]),
            3,
            RGBColor(255, 165, 0).stroke_width(1),
        )
    }))?;

    chart
        .draw_series(
            table
                .iter()
                .map(|r| Circle::new((r.timestamp, r.peak_amplitude), 4, RED.filled())),
        )?
        .label("peaks")
        .legend(|(x, y)| Circle::new((x + 10, y), 4, RED.filled()));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Render a plot and log the outcome; failures never propagate.
pub fn render_best_effort(
    series: &InputSeries,
    trace: &DetectionTrace,
    table: &PeakTable,
    dir: &Path,
) -> Option<PathBuf> {
    match render_detection(series, trace, table, dir) {
        Ok(path) => {
            info!("[{}] plot written to {}", series.id, path.display());
            Some(path)
        }
        Err(err) => {
            warn!("[{}] plot skipped: {}", series.id, err);
            None
        }
    }
}

fn finite_points(
    timestamps: &[f64],
    values: impl Iterator<Item = f64>,
) -> Vec<(f64, f64)> {
    timestamps
        .iter()
        .copied()
        .zip(values)
        .filter(|(_, v)| v.is_finite())
        .collect()
}

/// Inclusive index ranges of consecutive unmarked samples.
fn masked_runs(series: &InputSeries) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;

    for i in 0..series.len() {
        match (series.is_marked(i), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                runs.push((s, i - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, series.len() - 1));
    }
    runs
}

fn value_range(series: &InputSeries, trace: &DetectionTrace) -> Option<(f64, f64)> {
    let levels = (0..series.len()).flat_map(|i| {
        [
            series.values[i],
            trace.baseline.at(i),
            trace.cutoff_level(i).unwrap_or(f64::NAN),
        ]
    });

    let (lo, hi) = levels
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return None;
    }

    let pad = ((hi - lo) * 0.05).max(1e-6);
    Some((lo - pad, hi + pad))
}
