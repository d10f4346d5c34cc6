use common::{
    config::HexColor,
    metrics::Metrics,
    util::{format_iops, format_ratio},
};
use eyre::Result;
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::style::{Style, rgb};

pub const HEADER: [&str; 5] = [
    "SSD Type",
    "Append IOPS",
    "Read IOPS",
    "Total IOPS",
    "Read/Append Ratio",
];
const HEADER_FILL: HexColor = HexColor(0x44, 0x72, 0xC4);
const SHADED_FILL: HexColor = HexColor(0xE7, 0xE6, 0xE6);

/// Formatted body rows, one per device
pub fn table_rows(metrics: &Metrics) -> Vec<[String; 5]> {
    metrics
        .devices
        .iter()
        .map(|device| {
            [
                device.device.clone(),
                format_iops(device.append),
                format_iops(device.read),
                format_iops(device.total),
                format_ratio(device.ratio),
            ]
        })
        .collect()
}

/// Background of a row, counting the header as row 0
fn row_fill(row: usize) -> Option<HexColor> {
    match row {
        0 => Some(HEADER_FILL),
        r if r % 2 == 0 => Some(SHADED_FILL),
        _ => None,
    }
}

pub fn draw_table<DB>(
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
    let (width, height) = area.dim_in_pixel();
    let rows = table_rows(metrics);
    let row_count = rows.len() as i32 + 1;

    let table_width = (width as f64 * 0.9) as i32;
    let cell_width = table_width / HEADER.len() as i32;
    let cell_height = (height as i32 / (row_count + 1)).min(style.signed_px(40));
    let left = (width as i32 - cell_width * HEADER.len() as i32) / 2;
    let top = (height as i32 - cell_height * row_count) / 2;

    let header = style
        .bold(12.0)
        .color(&WHITE)
        .pos(Pos::new(HPos::Center, VPos::Center));
    let body = style.font(12.0).pos(Pos::new(HPos::Center, VPos::Center));
    let border = RGBColor(160, 160, 160).stroke_width(style.px(1));

    let cells = std::iter::once(HEADER.map(str::to_owned)).chain(rows);
    for (r, row) in cells.enumerate() {
        let y = top + r as i32 * cell_height;
        for (c, text) in row.into_iter().enumerate() {
            let x = left + c as i32 * cell_width;
            let corners = [(x, y), (x + cell_width, y + cell_height)];
            if let Some(fill) = row_fill(r) {
                area.draw(&Rectangle::new(corners, rgb(fill).filled()))?;
            }
            area.draw(&Rectangle::new(corners, border))?;
            let font = if r == 0 { &header } else { &body };
            area.draw(&Text::new(
                text,
                (x + cell_width / 2, y + cell_height / 2),
                font.clone(),
            ))?;
        }
    }
    Ok(())
}
