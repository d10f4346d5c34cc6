use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use common::{config::Config, metrics::derive};
use eyre::{Context, Result};
use tracing::error;
use tracing_subscriber::{
    EnvFilter,
    fmt::{layer, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

mod pipeline;
mod report;

/// Crates whose log level follows `RUST_LOG` unless overridden with `--log`
const MODULES: &[&str] = &["common", "iops_plots"];

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long)]
    log: Vec<String>,
}

#[derive(Args)]
struct Input {
    /// YAML config, defaults to the embedded SSD dataset and chart set
    #[arg(short, long)]
    config_file: Option<PathBuf>,
    /// CSV with `device,append,read` columns, replaces the dataset only
    #[arg(long)]
    data: Option<PathBuf>,
}

impl Input {
    async fn resolve(&self) -> Result<Config> {
        Config::resolve(self.config_file.as_deref(), self.data.as_deref()).await
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render every configured chart and print the key insights
    Plot {
        #[command(flatten)]
        input: Input,
        /// Overrides settings.output_dir
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the key insights without rendering
    Insights {
        #[command(flatten)]
        input: Input,
    },
    /// List the files a plot run would write
    Ls {
        #[command(flatten)]
        input: Input,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the default config as YAML
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or("warn".to_owned());
    let args = Cli::parse();
    let file_appender = tracing_appender::rolling::never(".", "log.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let mut env_filter = EnvFilter::new(format!("iops_report={log_level}"));

    if !args.log.is_empty() {
        for log in &args.log {
            env_filter = env_filter.add_directive(log.parse()?);
        }
    }

    for module in MODULES {
        if !args.log.iter().any(|x| x.starts_with(module)) {
            env_filter = env_filter.add_directive(format!("{module}={log_level}").parse()?);
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            layer()
                .with_timer(ChronoLocal::new("%v %k:%M:%S %z".to_owned()))
                .compact(),
        )
        .with(layer().with_writer(non_blocking))
        .init();

    match args.command {
        Commands::Plot { input, output_dir } => {
            let config = input.resolve().await?;
            if let Err(err) = pipeline::run(&config, output_dir).await {
                error!("{err:#?}");
                return Err(err);
            }
        }
        Commands::Insights { input } => {
            let config = input.resolve().await?;
            let metrics = derive(&config.dataset).wrap_err("Derive metrics")?;
            report::print_insights(&metrics);
        }
        Commands::Ls { input, output_dir } => {
            let config = input.resolve().await?;
            let plot_dir = output_dir.unwrap_or(config.settings.output_dir.clone());
            for artifact in pipeline::artifacts(&config, &plot_dir) {
                for path in artifact.paths() {
                    println!("{} -> {}", artifact.name, path.display());
                }
            }
        }
        Commands::Config => print!("{}", serde_yml::to_string(&Config::default())?),
    };

    Ok(())
}
