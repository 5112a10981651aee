use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use thiserror::Error;

use super::result_shape::{ChartData, Series, XAxis};

/// Chart configuration options
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub colors: Vec<RGBColor>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            title: "Query Result".to_string(),
            colors: vec![
                BLUE,
                RED,
                GREEN,
                MAGENTA,
                CYAN,
                RGBColor(255, 165, 0), // Orange
                RGBColor(128, 0, 128), // Purple
                RGBColor(255, 192, 203), // Pink
            ],
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerateChartError {
    #[error("{step}: {message}")]
    Draw { step: &'static str, message: String },
    #[error("NoData: nothing to plot")]
    NoData,
    #[error("NonFiniteRange: y axis {y_min}..{y_max}")]
    NonFiniteRange { y_min: f64, y_max: f64 },
}

fn draw_err<E: std::fmt::Display>(step: &'static str, err: E) -> GenerateChartError {
    GenerateChartError::Draw { step, message: err.to_string() }
}

/// Renders an SVG line chart (date axis) or grouped bar chart (label axis).
pub fn generate_result_chart(
    data: &ChartData,
    config: &ChartConfig,
) -> Result<String, GenerateChartError> {
    if data.x.is_empty() || data.series.is_empty() {
        return Err(GenerateChartError::NoData);
    }
    let y_range = calculate_y_range(&data.series)?;

    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, (config.width, config.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(|e| draw_err("FillBackground", e))?;

        match &data.x {
            XAxis::Dates(dates) => generate_date_chart(&root, data, dates, y_range, config)?,
            XAxis::Categories(labels) => {
                generate_bar_chart(&root, data, labels, y_range, config)?
            }
        }

        root.present().map_err(|e| draw_err("PresentChart", e))?;
    }

    Ok(buffer)
}

fn generate_date_chart(
    root: &DrawingArea<SVGBackend, plotters::coord::Shift>,
    data: &ChartData,
    dates: &[NaiveDate],
    (y_min, y_max): (f64, f64),
    config: &ChartConfig,
) -> Result<(), GenerateChartError> {
    let min_date = dates.iter().min().copied().unwrap_or_default();
    let mut max_date = dates.iter().max().copied().unwrap_or_default();
    if max_date <= min_date {
        max_date = min_date + Duration::days(1);
    }

    let mut chart = ChartBuilder::on(root)
        .caption(&config.title, ("Arial", 24).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(min_date..max_date, y_min..y_max)
        .map_err(|e| draw_err("BuildChart", e))?;

    chart
        .configure_mesh()
        .x_desc(data.x_name.as_str())
        .x_label_formatter(&|date| date.format("%Y-%m-%d").to_string())
        .y_label_formatter(&|y| format_y_value(*y))
        .draw()
        .map_err(|e| draw_err("ConfigureMesh", e))?;

    for (index, series) in data.series.iter().enumerate() {
        let color = series_color(config, index);
        chart
            .draw_series(LineSeries::new(
                dates.iter().copied().zip(series.values.iter().copied()),
                color.stroke_width(2),
            ))
            .map_err(|e| draw_err("DrawLineSeries", e))?
            .label(series.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], color));
    }

    if data.series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| draw_err("DrawLegend", e))?;
    }

    Ok(())
}

fn generate_bar_chart(
    root: &DrawingArea<SVGBackend, plotters::coord::Shift>,
    data: &ChartData,
    labels: &[String],
    (y_min, y_max): (f64, f64),
    config: &ChartConfig,
) -> Result<(), GenerateChartError> {
    let count = labels.len();
    let group_width = 0.8;
    let bar_width = group_width / data.series.len() as f64;

    let mut chart = ChartBuilder::on(root)
        .caption(&config.title, ("Arial", 24).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(count as f64 - 0.5), y_min..y_max)
        .map_err(|e| draw_err("BuildChart", e))?;

    let label_at = |x: &f64| {
        let index = x.round();
        if (x - index).abs() < 1e-6 && index >= 0.0 && (index as usize) < count {
            labels[index as usize].clone()
        } else {
            String::new()
        }
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(count)
        .x_desc(data.x_name.as_str())
        .x_label_formatter(&label_at)
        .y_label_formatter(&|y| format_y_value(*y))
        .draw()
        .map_err(|e| draw_err("ConfigureMesh", e))?;

    for (series_index, series) in data.series.iter().enumerate() {
        let color = series_color(config, series_index);
        let offset = -group_width / 2.0 + series_index as f64 * bar_width;
        chart
            .draw_series(series.values.iter().enumerate().map(|(index, value)| {
                let left = index as f64 + offset;
                Rectangle::new([(left, 0.0), (left + bar_width, *value)], color.filled())
            }))
            .map_err(|e| draw_err("DrawBarSeries", e))?
            .label(series.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 10, y + 4)], color.filled()));
    }

    if data.series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| draw_err("DrawLegend", e))?;
    }

    Ok(())
}

fn series_color(config: &ChartConfig, index: usize) -> RGBColor {
    config
        .colors
        .get(index % config.colors.len().max(1))
        .copied()
        .unwrap_or(BLUE)
}

/// Y range covering every value and zero, padded by 10%. Both bounds are finite.
fn calculate_y_range(series: &[Series]) -> Result<(f64, f64), GenerateChartError> {
    let values = series.iter().flat_map(|s| s.values.iter().copied());
    let (min_val, max_val) = values.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let (y_min, y_max) = if (max_val - min_val).abs() < f64::EPSILON {
        (min_val, min_val + 10.0)
    } else {
        let padding = (max_val - min_val) * 0.1;
        let y_min = if min_val < 0.0 { min_val - padding } else { 0.0 };
        (y_min, max_val + padding)
    };

    if !y_min.is_finite() || !y_max.is_finite() {
        return Err(GenerateChartError::NonFiniteRange { y_min, y_max });
    }

    Ok((y_min, y_max))
}

fn format_y_value(value: f64) -> String {
    if value.abs() >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value.abs() >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else if value.fract().abs() < f64::EPSILON {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}
