use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use common::{
    config::Settings,
    error::ReportError,
    metrics::{DeviceMetrics, Metrics},
    plot::{ChartArtifact, ChartKind, OutputFormat},
};
use eyre::{Context, Result};
use plotters::{coord::Shift, prelude::*};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{check_layout, draw_chart, style::Style};

pub const PLOT_DATA_DIR: &str = "plot_data";

/// The numbers behind a chart, written next to the images
#[derive(Debug, Serialize)]
pub struct PlotData<'a> {
    pub title: &'a str,
    pub kind: &'a ChartKind,
    pub devices: &'a [DeviceMetrics],
}

/// Opens the output for writing so an unwritable target fails before any drawing
fn acquire(path: &Path) -> Result<(), ReportError> {
    File::create(path)
        .map(drop)
        .map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Removes whatever a failed render left behind
fn discard(paths: &[(OutputFormat, PathBuf)]) {
    for (_, path) in paths {
        if !path.exists() {
            continue;
        }
        if let Err(err) = fs::remove_file(path) {
            warn!("Could not remove partial output {}: {err}", path.display());
        }
    }
}

fn draw_figure<DB>(
    root: DrawingArea<DB, Shift>,
    artifact: &ChartArtifact,
    metrics: &Metrics,
    style: &Style,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    draw_chart(&root, &artifact.title, &artifact.kind, metrics, style)?;
    root.present()?;
    Ok(())
}

/// Renders `artifact` once per output format and returns the written paths
pub fn persist(
    artifact: &ChartArtifact,
    metrics: &Metrics,
    settings: &Settings,
) -> Result<Vec<PathBuf>> {
    metrics.ensure_not_empty()?;
    check_layout(&artifact.title, &artifact.kind)?;

    let mut written = Vec::with_capacity(artifact.outputs.len());
    for (format, path) in &artifact.outputs {
        if let Err(err) = acquire(path) {
            discard(&artifact.outputs[..written.len()]);
            return Err(err.into());
        }
        let canvas = settings.canvas(*format);
        let style = Style::new(canvas.scale, &settings.palette);
        let size = (canvas.width, canvas.height);
        let rendered = match format {
            OutputFormat::Png => draw_figure(
                BitMapBackend::new(path, size).into_drawing_area(),
                artifact,
                metrics,
                &style,
            ),
            OutputFormat::Svg => draw_figure(
                SVGBackend::new(path, size).into_drawing_area(),
                artifact,
                metrics,
                &style,
            ),
        };
        if let Err(err) = rendered {
            discard(&artifact.outputs[..=written.len()]);
            return Err(err.wrap_err(format!("Render {} to {}", artifact.name, path.display())));
        }
        debug!("Wrote {} ({}x{})", path.display(), size.0, size.1);
        written.push(path.clone());
    }
    Ok(written)
}

/// Writes `<plot_dir>/plot_data/<name>.json`
pub fn write_plot_data(plot_dir: &Path, artifact: &ChartArtifact, metrics: &Metrics) -> Result<PathBuf> {
    let data_dir = plot_dir.join(PLOT_DATA_DIR);
    if !data_dir.exists() {
        fs::create_dir_all(&data_dir).map_err(|source| ReportError::Io {
            path: data_dir.clone(),
            source,
        })?;
    }
    let path = data_dir.join(format!("{}.json", artifact.name));
    let data = PlotData {
        title: &artifact.title,
        kind: &artifact.kind,
        devices: &metrics.devices,
    };
    fs::write(&path, serde_json::to_string_pretty(&data)?).map_err(|source| {
        ReportError::Io {
            path: path.clone(),
            source,
        }
    })?;
    Ok(path)
}
