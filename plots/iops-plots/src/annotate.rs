use eyre::Result;
use plotters::{
    coord::types::RangedCoordf64,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::style::Style;

pub type BarChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Where a label sits relative to its anchor point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Centered above a vertical bar
    Above,
    /// Left aligned after the end of a horizontal bar
    Right,
    /// Centered inside a bar segment
    Inside,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub at: (f64, f64),
    pub text: String,
    pub placement: Placement,
    /// Bold white text, for labels drawn on top of a filled bar
    pub on_bar: bool,
}

impl Annotation {
    pub fn above(at: (f64, f64), text: impl Into<String>) -> Self {
        Self::new(at, text, Placement::Above)
    }

    pub fn right(at: (f64, f64), text: impl Into<String>) -> Self {
        Self::new(at, text, Placement::Right)
    }

    pub fn inside(at: (f64, f64), text: impl Into<String>) -> Self {
        Self {
            on_bar: true,
            ..Self::new(at, text, Placement::Inside)
        }
    }

    fn new(at: (f64, f64), text: impl Into<String>, placement: Placement) -> Self {
        Self {
            at,
            text: text.into(),
            placement,
            on_bar: false,
        }
    }
}

impl Placement {
    /// Pixel offset from the anchor and the text alignment
    fn layout(&self, style: &Style) -> ((i32, i32), Pos) {
        let gap = style.signed_px(3);
        match self {
            Placement::Above => ((0, -gap), Pos::new(HPos::Center, VPos::Bottom)),
            Placement::Right => ((gap, 0), Pos::new(HPos::Left, VPos::Center)),
            Placement::Inside => ((0, 0), Pos::new(HPos::Center, VPos::Center)),
        }
    }
}

/// Draws value labels next to bars
pub fn annotate<'a, DB>(
    chart: &mut BarChart<'a, DB>,
    annotations: Vec<Annotation>,
    style: &Style,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
{
    chart.draw_series(annotations.into_iter().map(|annotation| {
        let (offset, pos) = annotation.placement.layout(style);
        let font = if annotation.on_bar {
            style.bold(9.0).color(&WHITE)
        } else {
            style.value()
        };
        EmptyElement::at(annotation.at) + Text::new(annotation.text, offset, font.pos(pos))
    }))?;
    Ok(())
}

/// Device name for a tick sitting on a category index, empty elsewhere
pub fn category_label(names: &[&str], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    names
        .get(idx as usize)
        .map(|x| x.to_string())
        .unwrap_or_default()
}

/// Axis range that puts category `i` at `i` with half a slot on either side
pub fn category_range(count: usize) -> std::ops::Range<f64> {
    -0.5..(count as f64 - 0.5)
}

/// Upper axis bound leaving headroom for labels
pub fn headroom(max: f64, factor: f64) -> f64 {
    if max > 0.0 { max * factor } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_only_on_categories() {
        let names = ["SK Hynix", "Samsung", "ZNS"];
        assert_eq!(category_label(&names, 0.0), "SK Hynix");
        assert_eq!(category_label(&names, 2.0000000001), "ZNS");
        assert_eq!(category_label(&names, 0.5), "");
        assert_eq!(category_label(&names, -1.0), "");
        assert_eq!(category_label(&names, 3.0), "");
    }

    #[test]
    fn ranges() {
        assert_eq!(category_range(3), -0.5..2.5);
        assert_eq!(headroom(100.0, 1.5), 150.0);
        assert_eq!(headroom(0.0, 1.15), 1.0);
    }

    #[test]
    fn placements() {
        let style = Style::new(2.0, &common::config::Palette::default());
        let (offset, _) = Placement::Above.layout(&style);
        assert_eq!(offset, (0, -6));
        let (offset, _) = Placement::Right.layout(&style);
        assert_eq!(offset, (6, 0));
        assert!(Annotation::inside((0.0, 1.0), "x").on_bar);
        assert!(!Annotation::above((0.0, 1.0), "x").on_bar);
    }
}
