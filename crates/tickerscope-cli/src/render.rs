//! Chart rendering.
//!
//! One PNG per ticker: three stacked panels (close price, rolling
//! volatility, RSI) over a shared date axis, with the author stamped in
//! the bottom-right corner. Rows whose indicator is undefined leave gaps
//! in the line rather than plotting zeros.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tickerscope_core::{IndicatorFrame, IndicatorRow};

use crate::error::CliError;

const CHART_WIDTH: u32 = 1200;
const CHART_HEIGHT: u32 = 1300;
const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;

pub fn render_chart(
    frame: &IndicatorFrame,
    path: &Path,
    volatility_window: usize,
    rsi_period: usize,
    author: &str,
) -> Result<(), CliError> {
    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let title = format!("{} Stock Analysis", frame.symbol);
    let titled = root
        .titled(&title, ("sans-serif", 36))
        .map_err(render_err)?;
    let panels = titled.split_evenly((3, 1));

    let closes: Vec<(i32, f64)> = frame
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| (i as i32, row.close))
        .collect();
    draw_panel(
        &panels[0],
        frame,
        "Close Price",
        "Price ($)",
        price_range(frame),
        &[closes],
        BLUE,
        &[],
    )?;

    draw_panel(
        &panels[1],
        frame,
        &format!("{volatility_window}-Day Rolling Volatility"),
        "Volatility",
        volatility_range(frame),
        &optional_segments(frame, |row| row.volatility),
        RED,
        &[],
    )?;

    draw_panel(
        &panels[2],
        frame,
        &format!("{rsi_period}-Day RSI"),
        "RSI",
        0.0..100.0,
        &optional_segments(frame, |row| row.rsi),
        RGBColor(128, 0, 128),
        &[(RSI_OVERBOUGHT, RED), (RSI_OVERSOLD, GREEN)],
    )?;

    let (width, height) = titled.dim_in_pixel();
    let watermark = TextStyle::from(("sans-serif", 18).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Bottom));
    titled
        .draw(&Text::new(
            author.to_owned(),
            (width as i32 - 15, height as i32 - 8),
            watermark,
        ))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_panel(
    panel: &DrawingArea<BitMapBackend<'_>, Shift>,
    frame: &IndicatorFrame,
    caption: &str,
    y_desc: &str,
    y_range: std::ops::Range<f64>,
    segments: &[Vec<(i32, f64)>],
    color: RGBColor,
    guides: &[(f64, RGBColor)],
) -> Result<(), CliError> {
    let x_max = (frame.len() as i32 - 1).max(1);

    let mut chart = ChartBuilder::on(panel)
        .caption(caption, ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(36)
        .y_label_area_size(64)
        .build_cartesian_2d(0..x_max, y_range)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .y_labels(6)
        .x_label_formatter(&|index| date_label(frame, *index))
        .y_desc(y_desc)
        .draw()
        .map_err(render_err)?;

    for segment in segments {
        if segment.len() == 1 {
            // A lone defined row gets a visible marker instead of a
            // zero-length line.
            chart
                .draw_series(
                    segment
                        .iter()
                        .map(|&point| Circle::new(point, 2, color.filled())),
                )
                .map_err(render_err)?;
        } else if !segment.is_empty() {
            chart
                .draw_series(LineSeries::new(segment.iter().copied(), &color))
                .map_err(render_err)?;
        }
    }

    for &(level, guide_color) in guides {
        let style = ShapeStyle {
            color: guide_color.mix(0.6),
            filled: false,
            stroke_width: 1,
        };
        chart
            .draw_series(DashedLineSeries::new([(0, level), (x_max, level)], 6, 4, style))
            .map_err(render_err)?;
    }

    Ok(())
}

/// Contiguous runs of defined values; each run renders as its own line so
/// undefined rows appear as gaps.
fn optional_segments(
    frame: &IndicatorFrame,
    value: impl Fn(&IndicatorRow) -> Option<f64>,
) -> Vec<Vec<(i32, f64)>> {
    let mut segments = Vec::new();
    let mut current: Vec<(i32, f64)> = Vec::new();

    for (i, row) in frame.rows.iter().enumerate() {
        match value(row) {
            Some(v) => current.push((i as i32, v)),
            None => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

fn price_range(frame: &IndicatorFrame) -> std::ops::Range<f64> {
    let (min, max) = frame
        .rows
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), row| {
            (lo.min(row.close), hi.max(row.close))
        });

    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0)..(max + 1.0);
    }
    (min * 0.98)..(max * 1.02)
}

fn volatility_range(frame: &IndicatorFrame) -> std::ops::Range<f64> {
    let max = frame
        .rows
        .iter()
        .filter_map(|row| row.volatility)
        .fold(0.0_f64, f64::max);
    0.0..(max * 1.1).max(0.1)
}

fn date_label(frame: &IndicatorFrame, index: i32) -> String {
    usize::try_from(index)
        .ok()
        .and_then(|i| frame.rows.get(i))
        .map(|row| row.date.format_iso())
        .unwrap_or_default()
}

fn render_err(error: impl std::fmt::Display) -> CliError {
    CliError::Render(error.to_string())
}
