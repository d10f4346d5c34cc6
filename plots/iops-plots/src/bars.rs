use std::ops::Range;

use common::{
    config::{HexColor, Palette},
    metrics::Metrics,
    plot::Metric,
    util::{format_iops, format_ratio},
};
use eyre::Result;
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::{
    annotate::{Annotation, BarChart, annotate, category_label, category_range, headroom},
    style::Style,
};

const GROUP_WIDTH: f64 = 0.35;
const BAR_WIDTH: f64 = 0.8;
const IOPS_HEADROOM: f64 = 1.15;
const RATIO_HEADROOM: f64 = 1.2;
const RATIO_NOTE: &str = "Values > 1: Read faster | Values < 1: Append faster";
/// Value axis tick count inside overview panels
const COMPACT_VALUE_LABELS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Categories along x, values up the y axis
    Vertical,
    /// Categories along y, values along the x axis
    Horizontal,
}

/// Bars sharing a color and a legend entry
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: Option<String>,
    pub color: HexColor,
    pub bars: Vec<[(f64, f64); 2]>,
}

/// Everything a bar chart draws, in data coordinates
#[derive(Debug, Clone)]
pub struct BarLayout {
    pub orientation: Orientation,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub series: Vec<Series>,
    pub annotations: Vec<Annotation>,
    pub x_desc: &'static str,
    pub y_desc: &'static str,
    pub value_format: fn(f64) -> String,
    pub outlined: bool,
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(0.0, f64::max)
}

fn metric_values(metrics: &Metrics, metric: Metric) -> Vec<f64> {
    match metric {
        Metric::Append => metrics.appends(),
        Metric::Read => metrics.reads(),
    }
}

/// Whole ticks get thousands separators, fractional ones keep up to two decimals
pub fn iops_axis(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        return format_iops(value);
    }
    let fixed = format!("{value:.2}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_owned()
}

fn ratio_axis(value: f64) -> String {
    format!("{value:.1}")
}

pub fn grouped_layout(metrics: &Metrics, palette: &Palette) -> BarLayout {
    let mut series = Vec::new();
    let mut annotations = Vec::new();
    for (metric, offset) in [(Metric::Append, -GROUP_WIDTH / 2.0), (Metric::Read, GROUP_WIDTH / 2.0)] {
        let values = metric_values(metrics, metric);
        let mut bars = Vec::with_capacity(values.len());
        for (i, value) in values.into_iter().enumerate() {
            let center = i as f64 + offset;
            bars.push([(center - GROUP_WIDTH / 2.0, 0.0), (center + GROUP_WIDTH / 2.0, value)]);
            annotations.push(Annotation::above((center, value), format_iops(value)));
        }
        series.push(Series {
            label: Some(metric.label().to_owned()),
            color: palette.metric(metric),
            bars,
        });
    }
    let max = max_of(&metrics.appends()).max(max_of(&metrics.reads()));
    BarLayout {
        orientation: Orientation::Vertical,
        x_range: category_range(metrics.devices.len()),
        y_range: 0.0..headroom(max, IOPS_HEADROOM),
        series,
        annotations,
        x_desc: "SSD Type",
        y_desc: "IOPS",
        value_format: iops_axis,
        outlined: false,
    }
}

pub fn stacked_layout(metrics: &Metrics, palette: &Palette) -> BarLayout {
    let half = BAR_WIDTH / 2.0;
    let mut append = Vec::new();
    let mut read = Vec::new();
    let mut annotations = Vec::new();
    for (i, device) in metrics.devices.iter().enumerate() {
        let x = i as f64;
        append.push([(x - half, 0.0), (x + half, device.append)]);
        read.push([(x - half, device.append), (x + half, device.total)]);
        annotations.push(Annotation::inside((x, device.append / 2.0), format_iops(device.append)));
        annotations.push(Annotation::inside(
            (x, device.append + device.read / 2.0),
            format_iops(device.read),
        ));
        annotations.push(Annotation::above(
            (x, device.total),
            format!("Total: {}", format_iops(device.total)),
        ));
    }
    BarLayout {
        orientation: Orientation::Vertical,
        x_range: category_range(metrics.devices.len()),
        y_range: 0.0..headroom(max_of(&metrics.totals()), IOPS_HEADROOM),
        series: vec![
            Series {
                label: Some(Metric::Append.label().to_owned()),
                color: palette.append,
                bars: append,
            },
            Series {
                label: Some(Metric::Read.label().to_owned()),
                color: palette.read,
                bars: read,
            },
        ],
        annotations,
        x_desc: "SSD Type",
        y_desc: "IOPS",
        value_format: iops_axis,
        outlined: false,
    }
}

pub fn horizontal_layout(metrics: &Metrics, palette: &Palette) -> BarLayout {
    let half = BAR_WIDTH / 2.0;
    let mut series = Vec::new();
    let mut annotations = Vec::new();
    for (metric, offset) in [(Metric::Append, -half / 2.0), (Metric::Read, half / 2.0)] {
        let values = metric_values(metrics, metric);
        let mut bars = Vec::with_capacity(values.len());
        for (i, value) in values.into_iter().enumerate() {
            let center = i as f64 + offset;
            bars.push([(0.0, center - half / 2.0), (value, center + half / 2.0)]);
            annotations.push(Annotation::right((value, center), format_iops(value)));
        }
        series.push(Series {
            label: Some(metric.label().to_owned()),
            color: palette.metric(metric),
            bars,
        });
    }
    let max = max_of(&metrics.appends()).max(max_of(&metrics.reads()));
    BarLayout {
        orientation: Orientation::Horizontal,
        // wider headroom, the labels run along the value axis
        x_range: 0.0..headroom(max, 1.25),
        y_range: category_range(metrics.devices.len()),
        series,
        annotations,
        x_desc: "IOPS",
        y_desc: "SSD Type",
        value_format: iops_axis,
        outlined: false,
    }
}

pub fn single_layout(metrics: &Metrics, metric: Metric, palette: &Palette) -> BarLayout {
    let half = BAR_WIDTH / 2.0;
    let values = metric_values(metrics, metric);
    let annotations = values
        .iter()
        .enumerate()
        .map(|(i, value)| Annotation::above((i as f64, *value), format_iops(*value)))
        .collect();
    BarLayout {
        orientation: Orientation::Vertical,
        x_range: category_range(values.len()),
        y_range: 0.0..headroom(max_of(&values), IOPS_HEADROOM),
        series: vec![Series {
            label: None,
            color: palette.metric(metric),
            bars: values
                .iter()
                .enumerate()
                .map(|(i, value)| [(i as f64 - half, 0.0), (i as f64 + half, *value)])
                .collect(),
        }],
        annotations,
        x_desc: "SSD Type",
        y_desc: "IOPS",
        value_format: iops_axis,
        outlined: true,
    }
}

/// One unlabeled series per device so each bar gets its own palette color
pub fn ratio_layout(metrics: &Metrics, palette: &Palette) -> BarLayout {
    let half = BAR_WIDTH / 2.0;
    let ratios = metrics.ratios();
    BarLayout {
        orientation: Orientation::Vertical,
        x_range: category_range(ratios.len()),
        y_range: 0.0..headroom(max_of(&ratios).max(1.0), RATIO_HEADROOM),
        series: ratios
            .iter()
            .enumerate()
            .map(|(i, ratio)| Series {
                label: None,
                color: palette.device(i),
                bars: vec![[(i as f64 - half, 0.0), (i as f64 + half, *ratio)]],
            })
            .collect(),
        annotations: ratios
            .iter()
            .enumerate()
            .map(|(i, ratio)| Annotation::above((i as f64, *ratio), format_ratio(*ratio)))
            .collect(),
        x_desc: "SSD Type",
        y_desc: "Read/Append Ratio",
        value_format: ratio_axis,
        outlined: true,
    }
}

/// Axes, bars and value labels; the legend is left to [`finish`]
pub fn build<'a, DB>(
    area: &'a DrawingArea<DB, Shift>,
    title: &str,
    names: &[&str],
    layout: &BarLayout,
    style: &Style,
) -> Result<BarChart<'a, DB>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (category_area, value_area) = match layout.orientation {
        Orientation::Vertical => (style.px(40), style.px(80)),
        Orientation::Horizontal => (style.px(40), style.px(90)),
    };
    let mut chart = ChartBuilder::on(area)
        .caption(title, style.title())
        .margin(style.px(12))
        .x_label_area_size(category_area)
        .y_label_area_size(value_area)
        .build_cartesian_2d(layout.x_range.clone(), layout.y_range.clone())?;

    let category = |value: &f64| category_label(names, *value);
    let value = |value: &f64| (layout.value_format)(*value);
    let mut mesh = chart.configure_mesh();
    mesh.light_line_style(WHITE)
        .bold_line_style(style.grid())
        .label_style(style.tick())
        .axis_desc_style(style.axis_desc())
        .x_desc(layout.x_desc)
        .y_desc(layout.y_desc);
    match layout.orientation {
        Orientation::Vertical => mesh
            .disable_x_mesh()
            .x_labels(names.len())
            .x_label_formatter(&category)
            .y_label_formatter(&value),
        Orientation::Horizontal => mesh
            .disable_y_mesh()
            .y_labels(names.len())
            .y_label_formatter(&category)
            .x_label_formatter(&value),
    };
    if style.compact {
        match layout.orientation {
            Orientation::Vertical => mesh.y_labels(COMPACT_VALUE_LABELS),
            Orientation::Horizontal => mesh.x_labels(COMPACT_VALUE_LABELS),
        };
    }
    mesh.draw()?;

    let legend_size = style.signed_px(5);
    for series in &layout.series {
        let fill = style.bar_fill(series.color);
        let drawn = chart.draw_series(
            series
                .bars
                .iter()
                .map(|corners| Rectangle::new(*corners, fill)),
        )?;
        if let Some(label) = &series.label {
            drawn.label(label.as_str()).legend(move |(x, y)| {
                Rectangle::new(
                    [(x, y - legend_size), (x + 2 * legend_size, y + legend_size)],
                    fill,
                )
            });
        }
        if layout.outlined {
            let outline = style.outline();
            chart.draw_series(
                series
                    .bars
                    .iter()
                    .map(|corners| Rectangle::new(*corners, outline)),
            )?;
        }
    }

    annotate(&mut chart, layout.annotations.clone(), style)?;
    Ok(chart)
}

/// Draws the legend when any series carries a label
pub fn finish<'a, DB>(chart: &mut BarChart<'a, DB>, layout: &BarLayout, style: &Style) -> Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
{
    if layout.series.iter().all(|x| x.label.is_none()) {
        return Ok(());
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font(style.font(11.0))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.3))
        .margin(style.px(8))
        .draw()?;
    Ok(())
}

pub fn draw_layout<DB>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    metrics: &Metrics,
    layout: &BarLayout,
    style: &Style,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let names = metrics.names();
    let mut chart = build(area, title, &names, layout, style)?;
    finish(&mut chart, layout, style)
}

pub fn draw_ratio<DB>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    metrics: &Metrics,
    style: &Style,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let names = metrics.names();
    let layout = ratio_layout(metrics, &style.palette);
    let mut chart = build(area, title, &names, &layout, style)?;

    let reference = RGBColor(128, 128, 128).mix(0.7).stroke_width(style.px(2));
    chart
        .draw_series(DashedLineSeries::new(
            vec![(layout.x_range.start, 1.0), (layout.x_range.end, 1.0)],
            style.px(8),
            style.px(5),
            reference,
        ))?
        .label("Equal Performance")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], reference));

    let note = style
        .font(10.0)
        .pos(Pos::new(HPos::Center, VPos::Top));
    let middle = (layout.x_range.start + layout.x_range.end) / 2.0;
    chart.draw_series(std::iter::once(
        EmptyElement::at((middle, layout.y_range.end))
            + Text::new(RATIO_NOTE, (0, style.signed_px(6)), note),
    ))?;

    // Only the reference line carries a legend entry; it goes below the note
    let below_note = style.signed_px(6) + style.signed_px(10) + style.signed_px(8);
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::Coordinate(style.signed_px(8), below_note))
        .label_font(style.font(10.0))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.3))
        .margin(style.px(8))
        .draw()?;
    Ok(())
}

/// Append and read single-series panels next to each other
pub fn draw_side_by_side<DB>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    metrics: &Metrics,
    style: &Style,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let area = area.titled(title, style.title())?;
    let panels = area.split_evenly((1, 2));
    for (panel, metric) in panels.iter().zip([Metric::Append, Metric::Read]) {
        let layout = single_layout(metrics, metric, &style.palette);
        draw_layout(
            panel,
            &format!("{} Performance", metric.label()),
            metrics,
            &layout,
            &style.panel(),
        )?;
    }
    Ok(())
}
