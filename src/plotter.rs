use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::info;

use crate::aggregator::Summary;
use crate::config::{chart_sizes, outputs};
use crate::error::{AppError, Result};

const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);
const BAR_COLOR: RGBColor = RGBColor(76, 114, 176);

#[derive(Debug, Clone)]
pub struct ChartPaths {
    pub games_by_surface: PathBuf,
    pub hold_rate_by_surface: PathBuf,
    pub games_per_month: PathBuf,
}

/// Render the three PNG charts into `out_dir`, creating it if needed.
pub fn render_charts(summary: &Summary, out_dir: &Path) -> Result<ChartPaths> {
    std::fs::create_dir_all(out_dir)?;
    let paths = ChartPaths {
        games_by_surface: out_dir.join(outputs::GAMES_BY_SURFACE),
        hold_rate_by_surface: out_dir.join(outputs::HOLD_RATE_BY_SURFACE),
        games_per_month: out_dir.join(outputs::GAMES_PER_MONTH),
    };

    info!("[PLOT] Creating plot 1: number of games by surface");
    let bars: Vec<(String, f64)> = summary
        .games_by_surface
        .iter()
        .map(|c| (c.key.clone(), c.count as f64))
        .collect();
    bar_chart(
        &paths.games_by_surface,
        &BarChart {
            title: "Number of Games by Surface",
            x_desc: "Surface",
            y_desc: "Number of Games",
            y_max: count_axis_max(bars.iter().map(|b| b.1)),
        },
        &bars,
    )?;

    info!("[PLOT] Creating plot 2: serve hold percentage by surface");
    let bars: Vec<(String, f64)> = summary
        .hold_rate_by_surface
        .iter()
        .map(|r| (r.key.clone(), r.rate))
        .collect();
    bar_chart(
        &paths.hold_rate_by_surface,
        &BarChart {
            title: "Serve Hold Percentage by Surface",
            x_desc: "Surface",
            y_desc: "Hold Rate (fraction of service games held)",
            y_max: 1.0,
        },
        &bars,
    )?;

    info!("[PLOT] Creating plot 3: number of games per month");
    let points: Vec<(String, f64)> = summary
        .games_per_month
        .iter()
        .map(|c| (c.key.to_string(), c.count as f64))
        .collect();
    month_line_chart(&paths.games_per_month, &points)?;

    info!("[PLOT] charts written to {}", out_dir.display());
    Ok(paths)
}

struct BarChart<'a> {
    title: &'a str,
    x_desc: &'a str,
    y_desc: &'a str,
    y_max: f64,
}

fn bar_chart(path: &Path, layout: &BarChart<'_>, bars: &[(String, f64)]) -> Result<()> {
    let root = BitMapBackend::new(path, chart_sizes::BAR).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    // A one-slot axis keeps empty datasets drawable.
    let slots = bars.len().max(1);
    let mut chart = ChartBuilder::on(&root)
        .caption(layout.title, CAPTION_FONT)
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d((0..slots).into_segmented(), 0f64..layout.y_max)
        .map_err(plot_err)?;

    let label_of = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => bars.get(*i).map(|b| b.0.clone()).unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(slots)
        .x_label_formatter(&label_of)
        .x_desc(layout.x_desc)
        .y_desc(layout.y_desc)
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BAR_COLOR.filled())
                .margin(20)
                .data(bars.iter().enumerate().map(|(i, b)| (i, b.1))),
        )
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

fn month_line_chart(path: &Path, points: &[(String, f64)]) -> Result<()> {
    let root = BitMapBackend::new(path, chart_sizes::LINE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let slots = points.len().max(1);
    let y_max = count_axis_max(points.iter().map(|p| p.1));
    let mut chart = ChartBuilder::on(&root)
        .caption("Number of Games per Month (2024 WTA Season)", CAPTION_FONT)
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d((0..slots).into_segmented(), 0f64..y_max)
        .map_err(plot_err)?;

    let label_of = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => points.get(*i).map(|p| p.0.clone()).unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .x_labels(slots)
        .x_label_formatter(&label_of)
        .x_label_style(("sans-serif", 12))
        .x_desc("Month")
        .y_desc("Number of Games")
        .draw()
        .map_err(plot_err)?;

    let series: Vec<(SegmentValue<usize>, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (SegmentValue::CenterOf(i), p.1))
        .collect();
    chart
        .draw_series(LineSeries::new(series.clone(), &BAR_COLOR))
        .map_err(plot_err)?;
    chart
        .draw_series(
            series
                .into_iter()
                .map(|point| Circle::new(point, 4, BAR_COLOR.filled())),
        )
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Headroom above the tallest bar; never below 1 so empty charts still have an axis.
fn count_axis_max(values: impl Iterator<Item = f64>) -> f64 {
    (values.fold(0.0_f64, f64::max) * 1.1).max(1.0)
}

fn plot_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Plot(e.to_string())
}
