use itertools::Itertools;

use crate::{
    metrics::{Comparison, Metrics},
    plot::ChartArtifact,
    util::{format_iops, format_multiple, format_ratio},
};

pub const RULE_WIDTH: usize = 50;

/// Numbered insight lines, empty when there is nothing to compare
pub fn insight_lines(metrics: &Metrics) -> Vec<String> {
    let Some(agg) = &metrics.aggregates else {
        return Vec::new();
    };

    let multiple = |comparison: &Comparison, metric: &str| match comparison.multiple {
        Some(multiple) => format!(
            "{} shows {} better {metric} than {}",
            comparison.leader,
            format_multiple(multiple),
            comparison.other
        ),
        None => format!(
            "{} has no {metric} throughput to compare against {}",
            comparison.other, comparison.leader
        ),
    };

    [
        format!(
            "Best Append Performance: {} ({} IOPS)",
            agg.best_append.device,
            format_iops(agg.best_append.value)
        ),
        format!(
            "Best Read Performance: {} ({} IOPS)",
            agg.best_read.device,
            format_iops(agg.best_read.value)
        ),
        format!(
            "Most Balanced: {} (Read/Append ratio: {})",
            agg.most_balanced.device,
            format_ratio(agg.most_balanced.value)
        ),
        multiple(&agg.append_multiple, "append"),
        multiple(&agg.read_multiple, "read"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, line)| format!("{}. {line}", i + 1))
    .collect()
}

/// One line per artifact listing the files written for it
pub fn generated_files(artifacts: &[ChartArtifact]) -> Vec<String> {
    let width = artifacts.iter().map(|x| x.name.len()).max().unwrap_or(0);
    artifacts
        .iter()
        .enumerate()
        .map(|(i, artifact)| {
            let paths = artifact.paths().map(|x| x.display()).join(", ");
            format!("{}. {:width$} - {paths}", i + 1, artifact.name)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::{
        dataset::{Dataset, DeviceRecord, ssd_iops},
        metrics::derive,
        plot::{ChartKind, ChartSpec, OutputFormat},
    };

    #[test]
    fn insights_for_embedded_dataset() {
        let lines = insight_lines(&derive(&ssd_iops()).unwrap());
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "1. Best Append Performance: ZNS (297,747 IOPS)");
        assert_eq!(lines[1], "2. Best Read Performance: SK Hynix (437,204 IOPS)");
        assert_eq!(lines[2], "3. Most Balanced: Samsung (Read/Append ratio: 0.81x)");
        assert_eq!(lines[3], "4. ZNS shows 1.8x better append than SK Hynix");
        assert_eq!(lines[4], "5. SK Hynix shows 10.1x better read than ZNS");
    }

    #[test]
    fn zero_partner_is_not_divided() {
        let dataset = Dataset::new(vec![
            DeviceRecord::new("fast", 400.0, 800.0),
            DeviceRecord::new("idle", 100.0, 0.0),
        ])
        .unwrap();
        let lines = insight_lines(&derive(&dataset).unwrap());
        assert_eq!(lines[4], "5. idle has no read throughput to compare against fast");
    }

    #[test]
    fn no_insights_without_devices() {
        assert!(insight_lines(&derive(&Dataset::default()).unwrap()).is_empty());
    }

    #[test]
    fn lists_generated_files() {
        let formats = [OutputFormat::Png, OutputFormat::Svg];
        let artifacts = vec![
            ChartSpec::new("table", "T", ChartKind::Table).artifact(Path::new("out"), &formats),
            ChartSpec::new("ratio_plot", "R", ChartKind::Ratio).artifact(Path::new("out"), &formats),
        ];
        assert_eq!(
            generated_files(&artifacts),
            vec![
                "1. table      - out/table.png, out/table.svg",
                "2. ratio_plot - out/ratio_plot.png, out/ratio_plot.svg",
            ]
        );
    }
}
