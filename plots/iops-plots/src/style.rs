use common::config::{HexColor, Palette};
use plotters::prelude::*;

/// Bar fill opacity shared by every chart kind
pub const BAR_ALPHA: f64 = 0.8;
pub const GRID_ALPHA: f64 = 0.15;

/// Sizes are given for a 100 units per inch canvas and scaled from there
#[derive(Debug, Clone)]
pub struct Style {
    pub scale: f64,
    pub palette: Palette,
    /// Set for panels inside a grid, thins out the value axis
    pub compact: bool,
}

impl Style {
    pub fn new(scale: f64, palette: &Palette) -> Self {
        Self {
            scale,
            palette: palette.clone(),
            compact: false,
        }
    }

    /// Same palette with everything shrunk, for panels inside a grid
    pub fn panel(&self) -> Self {
        Self {
            scale: self.scale * 0.75,
            palette: self.palette.clone(),
            compact: true,
        }
    }

    pub fn px(&self, size: u32) -> u32 {
        ((size as f64) * self.scale).round().max(1.0) as u32
    }

    pub fn signed_px(&self, size: i32) -> i32 {
        ((size as f64) * self.scale).round() as i32
    }

    pub fn font(&self, size: f64) -> TextStyle<'static> {
        ("sans-serif", size * self.scale).into_font().into()
    }

    pub fn bold(&self, size: f64) -> TextStyle<'static> {
        ("sans-serif", size * self.scale)
            .into_font()
            .style(FontStyle::Bold)
            .into()
    }

    pub fn title(&self) -> TextStyle<'static> {
        self.bold(16.0)
    }

    pub fn axis_desc(&self) -> TextStyle<'static> {
        self.bold(12.0)
    }

    pub fn tick(&self) -> TextStyle<'static> {
        self.font(10.0)
    }

    pub fn value(&self) -> TextStyle<'static> {
        self.font(10.0)
    }

    pub fn bar_fill(&self, color: HexColor) -> ShapeStyle {
        rgb(color).mix(BAR_ALPHA).filled()
    }

    pub fn outline(&self) -> ShapeStyle {
        BLACK.stroke_width(self.px(1))
    }

    pub fn grid(&self) -> ShapeStyle {
        BLACK.mix(GRID_ALPHA).stroke_width(self.px(1))
    }
}

pub fn rgb(color: HexColor) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_sizes() {
        let style = Style::new(3.0, &Palette::default());
        assert_eq!(style.px(10), 30);
        assert_eq!(style.signed_px(-4), -12);
        assert_eq!(style.panel().px(100), 225);
        assert!(!style.compact && style.panel().compact);
        assert_eq!(Style::new(0.01, &Palette::default()).px(1), 1);
    }

    #[test]
    fn palette_to_rgb() {
        let palette = Palette::default();
        assert_eq!(rgb(palette.append), RGBColor(0x2E, 0x86, 0xAB));
    }
}
