use common::{
    metrics::Metrics,
    plot::{ChartKind, Panel},
};
use eyre::{Result, bail};
use plotters::{coord::Shift, prelude::*};
use tracing::debug;

use crate::{
    bars::{
        draw_layout, draw_ratio, draw_side_by_side, grouped_layout, horizontal_layout,
        single_layout, stacked_layout,
    },
    style::Style,
    table::draw_table,
};

pub mod annotate;
pub mod bars;
pub mod persist;
pub mod style;
pub mod table;

/// Draws one chart onto `area`.
///
/// Fails with [`common::error::ReportError::EmptyDataset`] before drawing anything
/// when there are no devices.
pub fn draw_chart<DB>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    kind: &ChartKind,
    metrics: &Metrics,
    style: &Style,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    metrics.ensure_not_empty()?;
    let palette = &style.palette;
    match kind {
        ChartKind::Grouped => {
            draw_layout(area, title, metrics, &grouped_layout(metrics, palette), style)
        }
        ChartKind::Stacked => {
            draw_layout(area, title, metrics, &stacked_layout(metrics, palette), style)
        }
        ChartKind::Horizontal => draw_layout(
            area,
            title,
            metrics,
            &horizontal_layout(metrics, palette),
            style,
        ),
        ChartKind::Single { metric } => draw_layout(
            area,
            title,
            metrics,
            &single_layout(metrics, *metric, palette),
            style,
        ),
        ChartKind::Ratio => draw_ratio(area, title, metrics, style),
        ChartKind::SideBySide => draw_side_by_side(area, title, metrics, style),
        ChartKind::Table => draw_table(area, title, metrics, style),
        ChartKind::Overview { columns, panels } => {
            check_layout(title, kind)?;
            draw_overview(area, title, *columns, panels, metrics, style)
        }
    }
}

/// Rejects layouts that cannot be drawn, before any output is opened
pub fn check_layout(title: &str, kind: &ChartKind) -> Result<()> {
    let ChartKind::Overview { panels, .. } = kind else {
        return Ok(());
    };
    if panels.is_empty() {
        bail!("Overview {title} has no panels");
    }
    if let Some(nested) = panels
        .iter()
        .find(|x| matches!(x.kind, ChartKind::Overview { .. }))
    {
        bail!("Overview {title} cannot contain another overview ({})", nested.title);
    }
    Ok(())
}

/// Rows and columns needed to fit `panels` into `columns` per row
pub fn grid_shape(panels: usize, columns: usize) -> (usize, usize) {
    let columns = columns.clamp(1, panels.max(1));
    (panels.div_ceil(columns), columns)
}

fn draw_overview<DB>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    columns: usize,
    panels: &[Panel],
    metrics: &Metrics,
    style: &Style,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (rows, columns) = grid_shape(panels.len(), columns);
    debug!("Overview {title}: {} panels in {rows}x{columns}", panels.len());
    let area = area.titled(title, style.bold(20.0))?;
    let panel_style = style.panel();
    for (cell, panel) in area.split_evenly((rows, columns)).iter().zip(panels) {
        draw_chart(cell, &panel.title, &panel.kind, metrics, &panel_style)?;
    }
    Ok(())
}
