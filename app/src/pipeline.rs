use std::path::{Path, PathBuf};

use common::{
    config::Config,
    metrics::{Metrics, derive},
    plot::{ChartArtifact, ensure_plot_dirs},
};
use eyre::{Context, Result, bail};
use iops_plots::persist::{persist, write_plot_data};
use tracing::{debug, error, info};

use crate::report;

pub fn artifacts(config: &Config, plot_dir: &Path) -> Vec<ChartArtifact> {
    config
        .charts
        .iter()
        .map(|chart| chart.artifact(plot_dir, &config.settings.formats))
        .collect()
}

fn render(
    artifact: &ChartArtifact,
    config: &Config,
    plot_dir: &Path,
    metrics: &Metrics,
) -> Result<()> {
    let written = persist(artifact, metrics, &config.settings)?;
    let data = write_plot_data(plot_dir, artifact, metrics)?;
    debug!("{}: wrote {} files, data in {}", artifact.name, written.len(), data.display());
    Ok(())
}

/// Derives the metrics, renders every chart and prints the summary.
///
/// A failing chart does not stop the others; the run fails at the end
/// listing every chart that could not be written.
pub async fn run(config: &Config, output_dir: Option<PathBuf>) -> Result<()> {
    let plot_dir = output_dir.unwrap_or(config.settings.output_dir.clone());
    let metrics = derive(&config.dataset).wrap_err("Derive metrics")?;
    metrics.ensure_not_empty()?;

    ensure_plot_dirs(std::slice::from_ref(&plot_dir))
        .await
        .wrap_err(format!("Create plot dir {}", plot_dir.display()))?;

    info!(
        "Rendering {} charts for {} devices into {}",
        config.charts.len(),
        metrics.devices.len(),
        plot_dir.display()
    );
    let mut written = Vec::new();
    let mut failed = Vec::new();
    for artifact in artifacts(config, &plot_dir) {
        match render(&artifact, config, &plot_dir, &metrics) {
            Ok(()) => written.push(artifact),
            Err(err) => {
                error!("Chart {} failed: {err:#}", artifact.name);
                failed.push(artifact.name);
            }
        }
    }

    report::print_generated(&written);
    report::print_insights(&metrics);

    if !failed.is_empty() {
        bail!(
            "{} of {} charts failed: {}",
            failed.len(),
            config.charts.len(),
            failed.join(", ")
        );
    }
    Ok(())
}
