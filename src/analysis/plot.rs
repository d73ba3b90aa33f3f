use crate::analysis::distribution::HOURS_COLUMN;
use crate::analysis::error::AnalysisError;
use plotters::prelude::*;
use polars::prelude::DataFrame;
use std::path::Path;

const PLOT_SIZE: (u32, u32) = (1000, 800);

fn plot_err<E: std::fmt::Display>(e: E) -> AnalysisError {
    AnalysisError::Plot(e.to_string())
}

/// Draws the output of [`crate::hours_below_distribution`] as an SVG: `metric` against
/// hours, filled down to zero.
pub fn plot_hours_below(dist: &DataFrame, metric: &str, path: &Path) -> Result<(), AnalysisError> {
    let hours = dist
        .column(HOURS_COLUMN)
        .map_err(|_| AnalysisError::MissingColumn(HOURS_COLUMN.to_string()))?
        .f64()?;
    let values = dist
        .column(metric)
        .map_err(|_| AnalysisError::MissingColumn(metric.to_string()))?
        .f64()?;
    let points: Vec<(f64, f64)> = hours
        .into_iter()
        .zip(values.into_iter())
        .filter_map(|(h, v)| Some((h?, v?)))
        .collect();
    if points.is_empty() {
        return Err(AnalysisError::EmptyMetric(metric.to_string()));
    }

    let x_max = points.iter().map(|p| p.0).fold(1.0, f64::max);
    let y_min = points.iter().map(|p| p.1).fold(0.0, f64::min);
    let y_max = points.iter().map(|p| p.1).fold(0.0, f64::max);
    let y_pad = ((y_max - y_min) * 0.05).max(1.0);

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..x_max, (y_min - y_pad)..(y_max + y_pad))
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("hours")
        .y_desc(metric)
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(
            AreaSeries::new(points.iter().copied(), 0.0, GREEN.mix(0.5))
                .border_style(BLUE.stroke_width(2)),
        )
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}
