use common::{
    metrics::Metrics,
    plot::ChartArtifact,
    report::{RULE_WIDTH, generated_files, insight_lines},
};
use console::style;

pub fn print_insights(metrics: &Metrics) {
    let lines = insight_lines(metrics);
    if lines.is_empty() {
        println!("{}", style("No devices in dataset").yellow());
        return;
    }

    let rule = "=".repeat(RULE_WIDTH);
    println!("\n{}", style("Key Insights:").bold());
    println!("{}", style(&rule).dim());
    for line in lines {
        println!("{line}");
    }
    println!("{}", style(&rule).dim());
}

pub fn print_generated(artifacts: &[ChartArtifact]) {
    if artifacts.is_empty() {
        return;
    }

    let rule = "-".repeat(RULE_WIDTH);
    println!("{}", style("Generated files:").bold());
    println!("{}", style(&rule).dim());
    for line in generated_files(artifacts) {
        println!("{line}");
    }
    println!("{}", style(&rule).dim());
}
