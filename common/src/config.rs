use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs::read_to_string;
use tracing::debug;

use crate::{
    dataset::{Dataset, ssd_iops},
    error::ReportError,
    plot::{ChartKind, ChartSpec, Metric, OutputFormat, Panel},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub name: String,
    pub settings: Settings,
    pub dataset: Dataset,
    pub charts: Vec<ChartSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "ssd-iops".to_owned(),
            settings: Settings::default(),
            dataset: ssd_iops(),
            charts: default_charts(),
        }
    }
}

impl Config {
    pub async fn load(path: &Path) -> Result<Self> {
        let data = read_to_string(path)
            .await
            .wrap_err(format!("Read config {}", path.display()))?;
        serde_yml::from_str(&data).wrap_err(format!("Parse config {}", path.display()))
    }

    /// Embedded defaults, or `config_file` if given; `data_file` replaces the dataset only
    pub async fn resolve(config_file: Option<&Path>, data_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::load(path).await?,
            None => Self::default(),
        };
        if let Some(path) = data_file {
            let data = read_to_string(path)
                .await
                .wrap_err(format!("Read dataset {}", path.display()))?;
            config.dataset =
                Dataset::from_csv(&data).wrap_err(format!("Parse dataset {}", path.display()))?;
        }
        debug!(
            "Config {}: {} devices, {} charts",
            config.name,
            config.dataset.len(),
            config.charts.len()
        );
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub dpi: u32,
    /// Figure size in inches
    pub figure: FigureSize,
    pub formats: Vec<OutputFormat>,
    pub palette: Palette,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("plots"),
            dpi: 300,
            figure: FigureSize::default(),
            formats: vec![OutputFormat::Png, OutputFormat::Svg],
            palette: Palette::default(),
        }
    }
}

/// Vector outputs use this many units per inch
pub const VECTOR_UNITS_PER_INCH: f64 = 100.0;

impl Settings {
    /// Pixel size and font scale for a format
    pub fn canvas(&self, format: OutputFormat) -> Canvas {
        let units_per_inch = match format {
            OutputFormat::Png => self.dpi as f64,
            OutputFormat::Svg => VECTOR_UNITS_PER_INCH,
        };
        Canvas {
            width: (self.figure.width * units_per_inch).round() as u32,
            height: (self.figure.height * units_per_inch).round() as u32,
            scale: units_per_inch / VECTOR_UNITS_PER_INCH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    /// Multiplier for font sizes, margins and strokes
    pub scale: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureSize {
    pub width: f64,
    pub height: f64,
}

impl Default for FigureSize {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub append: HexColor,
    pub read: HexColor,
    /// Cycled through for per-device bars
    pub ratio: Vec<HexColor>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            append: HexColor(0x2E, 0x86, 0xAB),
            read: HexColor(0xA2, 0x3B, 0x72),
            ratio: vec![
                HexColor(0x2E, 0x86, 0xAB),
                HexColor(0xF1, 0x8F, 0x01),
                HexColor(0xA2, 0x3B, 0x72),
            ],
        }
    }
}

impl Palette {
    pub fn metric(&self, metric: Metric) -> HexColor {
        match metric {
            Metric::Append => self.append,
            Metric::Read => self.read,
        }
    }

    pub fn device(&self, idx: usize) -> HexColor {
        if self.ratio.is_empty() {
            return self.append;
        }
        self.ratio[idx % self.ratio.len()]
    }
}

/// `#RRGGBB` color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub u8, pub u8, pub u8);

impl TryFrom<String> for HexColor {
    type Error = ReportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let invalid = || ReportError::InvalidColor(value.clone());
        let hex = value.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        format!("#{:02X}{:02X}{:02X}", color.0, color.1, color.2)
    }
}

/// The chart set both report scripts produced
pub fn default_charts() -> Vec<ChartSpec> {
    let append = ChartKind::Single {
        metric: Metric::Append,
    };
    let read = ChartKind::Single {
        metric: Metric::Read,
    };
    vec![
        ChartSpec::new(
            "0_all_charts_overview",
            "All Visualizations - Overview",
            ChartKind::Overview {
                columns: 3,
                panels: vec![
                    Panel::new("Grouped Bars", ChartKind::Grouped),
                    Panel::new("Stacked Bars", ChartKind::Stacked),
                    Panel::new("Read/Append Ratio", ChartKind::Ratio),
                    Panel::new("Append Performance", append.clone()),
                    Panel::new("Read Performance", read.clone()),
                    Panel::new("Horizontal Bars", ChartKind::Horizontal),
                ],
            },
        ),
        ChartSpec::new(
            "1_grouped_bar_chart",
            "SSD Performance Comparison: Append vs Read Operations",
            ChartKind::Grouped,
        ),
        ChartSpec::new(
            "2_stacked_bar_chart",
            "Total IOPS Performance: Stacked View",
            ChartKind::Stacked,
        ),
        ChartSpec::new(
            "3_horizontal_bar_chart",
            "SSD Performance Comparison: Horizontal View",
            ChartKind::Horizontal,
        ),
        ChartSpec::new(
            "4_ratio_comparison",
            "Read vs Append Performance Ratio",
            ChartKind::Ratio,
        ),
        ChartSpec::new(
            "5_side_by_side_comparison",
            "SSD Performance: Append vs Read (Separate Views)",
            ChartKind::SideBySide,
        ),
        ChartSpec::new(
            "6_summary_table",
            "SSD Performance Summary Table",
            ChartKind::Table,
        ),
        ChartSpec::new(
            "ssd_iops_analysis_comprehensive",
            "SSD Performance Analysis: Append vs Read IOPS",
            ChartKind::Overview {
                columns: 2,
                panels: vec![
                    Panel::new("IOPS Comparison: Grouped Bar Chart", ChartKind::Grouped),
                    Panel::new("Total IOPS: Stacked Bar Chart", ChartKind::Stacked),
                    Panel::new("IOPS Comparison: Horizontal Bars", ChartKind::Horizontal),
                    Panel::new("Read vs Append Performance Ratio", ChartKind::Ratio),
                ],
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(
            HexColor::try_from("#4472C4".to_owned()).unwrap(),
            HexColor(0x44, 0x72, 0xC4)
        );
        assert_eq!(String::from(HexColor(0xE7, 0xE6, 0xE6)), "#E7E6E6");
        for bad in ["4472C4", "#4472C", "#GG0000", "#ééé"] {
            assert!(matches!(
                HexColor::try_from(bad.to_owned()),
                Err(ReportError::InvalidColor(_))
            ));
        }
    }

    #[test]
    fn canvas_per_format() {
        let settings = Settings::default();
        let png = settings.canvas(OutputFormat::Png);
        assert_eq!((png.width, png.height), (3000, 1800));
        assert_eq!(png.scale, 3.0);
        let svg = settings.canvas(OutputFormat::Svg);
        assert_eq!((svg.width, svg.height), (1000, 600));
        assert_eq!(svg.scale, 1.0);
    }

    #[test]
    fn palette_cycles() {
        let palette = Palette::default();
        assert_eq!(palette.device(3), palette.device(0));
        let empty = Palette {
            ratio: vec![],
            ..Palette::default()
        };
        assert_eq!(empty.device(1), empty.append);
    }

    #[test]
    fn default_config_round_trips_through_yaml() {
        let config = Config::default();
        let yaml = serde_yml::to_string(&config).unwrap();
        let parsed: Config = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let yaml = r#"
name: zns-second-run
settings:
  dpi: 150
dataset:
  - { device: ZNS, append: 297746.5, read: 349782 }
"#;
        let config: Config = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.settings.dpi, 150);
        assert_eq!(config.settings.formats, Settings::default().formats);
        assert_eq!(config.dataset.len(), 1);
        assert_eq!(config.charts, default_charts());
    }

    #[test]
    fn shipped_configs_parse() {
        let combined: Config =
            serde_yml::from_str(include_str!("../../configs/ssd-iops.yaml")).unwrap();
        assert_eq!(combined.dataset, ssd_iops());
        assert_eq!(combined.settings, Settings::default());
        assert_eq!(combined.charts.len(), 6);

        let separate: Config =
            serde_yml::from_str(include_str!("../../configs/ssd-iops-separate.yaml")).unwrap();
        assert_eq!(separate.dataset.records()[2].read, 349782.0);
        assert_eq!(separate.charts, default_charts());

        let csv = Dataset::from_csv(include_str!("../../configs/ssd-iops.csv")).unwrap();
        assert_eq!(csv, ssd_iops());
    }

    #[tokio::test]
    async fn resolve_replaces_dataset_from_csv() {
        let tmp = tempfile::tempdir().unwrap();
        let csv = tmp.path().join("data.csv");
        std::fs::write(&csv, "device,append,read\nA,10,20\nB,30,15\n").unwrap();

        let config = Config::resolve(None, Some(&csv)).await.unwrap();
        assert_eq!(config.dataset.len(), 2);
        assert_eq!(config.charts, default_charts());
    }

    #[tokio::test]
    async fn resolve_reports_missing_config() {
        let err = Config::resolve(Some(Path::new("/nonexistent/config.yaml")), None)
            .await
            .unwrap_err();
        assert!(format!("{err}").contains("/nonexistent/config.yaml"));
    }
}
