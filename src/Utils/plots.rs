use crate::error::OutputError;
use crate::numerical::sampler::PlotData;
use log::info;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

const CHART_SIZE: (u32, u32) = (1000, 600);
const TRAPEZOID_COLOR: RGBColor = RGBColor(255, 127, 14);

fn plot_error<E: std::fmt::Display>(e: E) -> OutputError {
    OutputError::Plot(e.to_string())
}

/// Splits a sampled curve into runs of finite points, so poles and holes break the line.
pub fn finite_segments(x: &[f64], y: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        if yi.is_finite() {
            current.push((xi, yi));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// x range covering the interval, y range covering every finite sample and the axis y = 0,
/// both padded by 5 %.
pub fn axis_ranges(plot: &PlotData) -> (Range<f64>, Range<f64>) {
    let (x_lo, x_hi) = plot
        .dense_x
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });
    let (x_lo, x_hi) = if x_lo.is_finite() { (x_lo, x_hi) } else { (0.0, 1.0) };
    let (y_lo, y_hi) = plot
        .finite_y_range()
        .map(|(lo, hi)| (lo.min(0.0), hi.max(0.0)))
        .unwrap_or((0.0, 1.0));
    (padded(x_lo, x_hi), padded(y_lo, y_hi))
}

fn padded(lo: f64, hi: f64) -> Range<f64> {
    let span = hi - lo;
    if span > 0.0 {
        (lo - 0.05 * span)..(hi + 0.05 * span)
    } else {
        (lo - 0.5)..(hi + 0.5)
    }
}

/// Draws the function curve in blue and the trapezoids of the approximation in
/// semi-transparent orange into a png file.
pub fn plot_trapezoid<P: AsRef<Path>>(plot: &PlotData, path: P) -> Result<(), OutputError> {
    let path = path.as_ref();
    let (x_range, y_range) = axis_ranges(plot);
    let root_area = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root_area.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root_area)
        .caption("Trapezoidal Approximation", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("f(x)")
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(
            plot.trapezoids()
                .into_iter()
                .map(|corners| Polygon::new(corners.to_vec(), TRAPEZOID_COLOR.mix(0.4).filled())),
        )
        .map_err(plot_error)?
        .label("Trapezoid Approximation")
        .legend(|(x, y)| {
            Rectangle::new([(x, y - 5), (x + 20, y + 5)], TRAPEZOID_COLOR.mix(0.4).filled())
        });

    let dense_x = plot.dense_x.as_slice();
    let dense_y = plot.dense_y.as_slice();
    for (i, segment) in finite_segments(dense_x, dense_y).into_iter().enumerate() {
        let series = chart
            .draw_series(LineSeries::new(segment, BLUE.stroke_width(2)))
            .map_err(plot_error)?;
        // one legend entry for all pieces of the curve
        if i == 0 {
            series
                .label("Function")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_error)?;
    root_area.present().map_err(plot_error)?;
    info!("plot saved to {}", path.display());
    Ok(())
}
