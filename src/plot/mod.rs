//! Chart rendering for IV curves and threshold-vs-time series
//!
//! One PNG per run. In IV mode the chart carries, per sweep, the raw
//! error-bar Id/Vg curve (color-graded by the sweep's position within the
//! series), the dashed steepest-slope tangent line, and the dashed
//! second-derivative curve scaled into the current range for co-plotting.
//! In time mode the threshold estimates are plotted against sweep index
//! with their error bounds.
//!
//! Derivative curves are recomputed here from the raw samples; the scaling
//! is purely visual and never feeds back into the reported voltages.

use std::path::{Path, PathBuf};

use anyhow::Result;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::config::AnalysisConfig;
use crate::estimate::{SteepestSlopeFit, ThresholdEstimate};
use crate::numeric::{second_derivative, trimmed_window};
use crate::sweep::SweepSeries;

const CHART_SIZE: (u32, u32) = (1280, 960);
const TANGENT_COLOR: RGBColor = RED;
const DERIVATIVE_COLOR: RGBColor = GREEN;

/// Derive the output image path from the input file and the selected mode.
///
/// The image lands next to the input (or in `output_dir` when given) as
/// `<input-stem>_<suffix>.png`.
pub fn output_path(input: &Path, output_dir: Option<&Path>, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let name = format!("{}_{}.png", stem, suffix);
    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

/// Position-graded series color, interpolating blue (first sweep) to red
/// (last sweep).
fn series_color(index: usize, series_len: usize) -> RGBColor {
    let t = index as f64 / series_len.max(1) as f64;
    RGBColor((255.0 * t) as u8, 0, (255.0 * (1.0 - t)) as u8)
}

/// Render the instantaneous-mode chart: IV curves, tangent lines, and
/// scaled second-derivative curves, as selected.
///
/// `steepest` holds one entry per sweep; `None` marks a sweep whose
/// estimate failed and whose tangent line is therefore omitted.
pub fn render_iv_chart(
    path: &Path,
    series: &SweepSeries,
    steepest: &[Option<SteepestSlopeFit>],
    config: &AnalysisConfig,
) -> Result<()> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for sweep in series {
        for &v in &sweep.voltages {
            x_min = x_min.min(v);
            x_max = x_max.max(v);
        }
        for &c in &sweep.currents {
            y_max = y_max.max(c);
        }
    }
    if !(x_min.is_finite() && x_max.is_finite() && y_max.is_finite()) {
        return Ok(());
    }
    let x_pad = ((x_max - x_min) * 0.05).max(1e-12);
    let y_top = (y_max * 1.1).max(1e-12);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Id vs Vg for a MOSFET", ("sans-serif", 28))
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d((x_min - x_pad)..(x_max + x_pad), 0.0..y_top)?;

    chart
        .configure_mesh()
        .x_desc("Vg")
        .y_desc("Id")
        .draw()?;

    for (i, sweep) in series.iter().enumerate() {
        let color = series_color(i, series.len());

        if config.iv_graph {
            let curve = sweep
                .voltages
                .iter()
                .zip(sweep.currents.iter())
                .map(|(&v, &c)| (v, c));
            let drawn = chart.draw_series(LineSeries::new(curve, &color))?;
            if i % 10 == 0 {
                drawn.label(format!("sweep {}", i)).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color)
                });
            }

            // Vertical whiskers for the current uncertainty, horizontal for
            // the voltage uncertainty.
            chart.draw_series(
                sweep
                    .voltages
                    .iter()
                    .zip(sweep.currents.iter())
                    .zip(sweep.current_std.iter())
                    .map(|((&v, &c), &s)| {
                        ErrorBar::new_vertical(v, c - s, c, c + s, color.filled(), 4)
                    }),
            )?;
            chart.draw_series(
                sweep
                    .voltages
                    .iter()
                    .zip(sweep.currents.iter())
                    .zip(sweep.voltage_std.iter())
                    .map(|((&v, &c), &s)| {
                        ErrorBar::new_horizontal(c, v - s, v, v + s, color.filled(), 4)
                    }),
            )?;
        }

        if config.steepest_line {
            if let Some(fit) = steepest.get(i).and_then(|f| f.as_ref()) {
                let line = sweep.voltages.iter().map(|&v| (v, fit.tangent.eval(v)));
                chart.draw_series(DashedLineSeries::new(
                    line,
                    6,
                    4,
                    TANGENT_COLOR.stroke_width(1),
                ))?;
            }
        }

        if config.derivative {
            if let Some((window, scaled)) = scaled_second_derivative(sweep) {
                chart.draw_series(DashedLineSeries::new(
                    window.iter().copied().zip(scaled),
                    6,
                    4,
                    DERIVATIVE_COLOR.stroke_width(1),
                ))?;
            }
        }
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.7))
        .border_style(&BLACK.mix(0.3))
        .draw()?;

    root.present()?;
    Ok(())
}

/// The second-derivative curve of a sweep, scaled into the current range
/// for co-plotting. Scaling is visual only.
fn scaled_second_derivative(sweep: &crate::sweep::Sweep) -> Option<(Vec<f64>, Vec<f64>)> {
    if sweep.validate().is_err() {
        return None;
    }
    let d2 = second_derivative(&sweep.voltages, &sweep.currents);
    if d2.is_empty() {
        return None;
    }
    let max_current = sweep.currents.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let max_d2 = d2.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(max_current.is_finite() && max_d2.is_finite()) || max_d2 == 0.0 {
        return None;
    }
    let scale = max_current / max_d2;
    let window = trimmed_window(&sweep.voltages).to_vec();
    let scaled = d2.into_iter().map(|v| v * scale).collect();
    Some((window, scaled))
}

/// Render the time-series chart: threshold estimates against sweep index.
///
/// `peaks` feeds the second-derivative series (`dvt_over_time`), `steepest`
/// the tangent-extrapolation series (`lvt_over_time`); sweeps whose
/// estimate failed are omitted from their series.
pub fn render_time_chart(
    path: &Path,
    steepest: &[Option<SteepestSlopeFit>],
    peaks: &[Option<ThresholdEstimate>],
    config: &AnalysisConfig,
) -> Result<()> {
    let peak_points: Vec<(f64, ThresholdEstimate)> = peaks
        .iter()
        .enumerate()
        .filter_map(|(i, e)| e.map(|e| (i as f64, e)))
        .collect();
    let slope_points: Vec<(f64, ThresholdEstimate)> = steepest
        .iter()
        .enumerate()
        .filter_map(|(i, f)| f.map(|f| (i as f64, f.estimate)))
        .collect();

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    let mut x_max = 1.0f64;
    for (x, est) in peak_points.iter().chain(slope_points.iter()) {
        y_min = y_min.min(est.volts - est.error);
        y_max = y_max.max(est.volts + est.error);
        x_max = x_max.max(*x);
    }
    if !(y_min.is_finite() && y_max.is_finite()) {
        return Ok(());
    }
    let y_pad = ((y_max - y_min) * 0.1).max(1e-6);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Threshold Voltage vs Time", ("sans-serif", 28))
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d(
            -0.5..(x_max + 0.5),
            (y_min - y_pad)..(y_max + y_pad),
        )?;

    chart
        .configure_mesh()
        .x_desc("Time hrs")
        .y_desc("Vt")
        .draw()?;

    if config.dvt_over_time && !peak_points.is_empty() {
        chart
            .draw_series(LineSeries::new(
                peak_points.iter().map(|(x, e)| (*x, e.volts)),
                &DERIVATIVE_COLOR,
            ))?
            .label("second-derivative Vt")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], DERIVATIVE_COLOR));
        chart.draw_series(peak_points.iter().map(|(x, e)| {
            ErrorBar::new_vertical(
                *x,
                e.volts - e.error,
                e.volts,
                e.volts + e.error,
                DERIVATIVE_COLOR.filled(),
                6,
            )
        }))?;
    }

    if config.lvt_over_time && !slope_points.is_empty() {
        chart
            .draw_series(LineSeries::new(
                slope_points.iter().map(|(x, e)| (*x, e.volts)),
                &TANGENT_COLOR,
            ))?
            .label("steepest-slope Vt")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], TANGENT_COLOR));
        chart.draw_series(slope_points.iter().map(|(x, e)| {
            ErrorBar::new_vertical(
                *x,
                e.volts - e.error,
                e.volts,
                e.volts + e.error,
                TANGENT_COLOR.filled(),
                6,
            )
        }))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.7))
        .border_style(&BLACK.mix(0.3))
        .draw()?;

    root.present()?;
    Ok(())
}
