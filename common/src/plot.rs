use std::path::{Path, PathBuf};

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::fs::create_dir_all;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Append,
    Read,
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Append => "Append",
            Metric::Read => "Read",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    /// Append and read bars next to each other per device
    Grouped,
    /// Read stacked on append, total above each stack
    Stacked,
    Horizontal,
    /// Read/append ratio per device with a reference line at 1.0
    Ratio,
    Single {
        metric: Metric,
    },
    SideBySide,
    Table,
    /// Grid of panels sharing one caption
    Overview {
        columns: usize,
        panels: Vec<Panel>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub title: String,
    pub kind: ChartKind,
}

impl Panel {
    pub fn new(title: impl Into<String>, kind: ChartKind) -> Self {
        Self {
            title: title.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Raster image, rendered at the configured dpi
    Png,
    /// Vector document
    Svg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}

/// A chart as listed in the config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// File stem of the outputs
    pub name: String,
    pub title: String,
    #[serde(flatten)]
    pub kind: ChartKind,
}

impl ChartSpec {
    pub fn new(name: impl Into<String>, title: impl Into<String>, kind: ChartKind) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            kind,
        }
    }

    pub fn artifact(&self, plot_dir: &Path, formats: &[OutputFormat]) -> ChartArtifact {
        ChartArtifact {
            name: self.name.clone(),
            title: self.title.clone(),
            kind: self.kind.clone(),
            outputs: formats
                .iter()
                .map(|format| {
                    (
                        *format,
                        plot_dir.join(format!("{}.{}", self.name, format.extension())),
                    )
                })
                .collect(),
        }
    }
}

/// A chart bound to the files it is written to, created once per run
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
    pub name: String,
    pub title: String,
    pub kind: ChartKind,
    pub outputs: Vec<(OutputFormat, PathBuf)>,
}

impl ChartArtifact {
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.outputs.iter().map(|(_, path)| path.as_path())
    }
}

pub async fn ensure_plot_dirs(dirs: &[PathBuf]) -> eyre::Result<()> {
    let create_jobs = dirs.iter().map(create_dir_all);
    for res in join_all(create_jobs).await {
        res?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_paths_follow_formats() {
        let spec = ChartSpec::new("4_ratio_comparison", "Ratio", ChartKind::Ratio);
        let artifact = spec.artifact(Path::new("plots"), &[OutputFormat::Png, OutputFormat::Svg]);
        let paths = artifact.paths().collect::<Vec<_>>();
        assert_eq!(
            paths,
            vec![
                Path::new("plots/4_ratio_comparison.png"),
                Path::new("plots/4_ratio_comparison.svg")
            ]
        );
    }

    #[test]
    fn chart_spec_yaml() {
        let yaml = r#"
name: overview
title: All
type: overview
columns: 2
panels:
  - title: Append
    kind: { type: single, metric: append }
  - title: Table
    kind: { type: table }
"#;
        let spec: ChartSpec = serde_yml::from_str(yaml).unwrap();
        assert_eq!(
            spec.kind,
            ChartKind::Overview {
                columns: 2,
                panels: vec![
                    Panel::new(
                        "Append",
                        ChartKind::Single {
                            metric: Metric::Append
                        }
                    ),
                    Panel::new("Table", ChartKind::Table),
                ],
            }
        );
    }

    #[tokio::test]
    async fn creates_nested_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = vec![tmp.path().join("a/b"), tmp.path().join("plot_data")];
        ensure_plot_dirs(&dirs).await.unwrap();
        assert!(dirs.iter().all(|x| x.is_dir()));
    }
}
