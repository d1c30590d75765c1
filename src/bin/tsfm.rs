//! tsfm CLI: invoke hosted forecasting endpoints over windowed batches.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use tsfm_client::config::AppConfig;
use tsfm_client::data::read_entity_series;
use tsfm_client::endpoint::{EndpointRegistry, HttpPredictor};
use tsfm_client::invoke::run_forecast;

#[derive(Parser)]
#[command(name = "tsfm")]
#[command(author, version)]
#[command(about = "Invoke a hosted TimesFM-style forecasting endpoint with batched time series")]
struct Cli {
    /// Path to the run configuration file
    #[arg(short, long, default_value = "config/tsfm.toml", value_name = "FILE")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Window the dataset, invoke the first registered endpoint, and
    /// persist per-batch forecasts
    Forecast {
        /// Override the configured output directory
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
    /// List registered endpoints, oldest first
    Endpoints,
    /// Probe the first registered endpoint's health route
    Health,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_file(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    match cli.command {
        Commands::Forecast { output_dir } => {
            let registry = EndpointRegistry::load(&config.endpoint.registry)?;
            let endpoint = registry.first()?;
            let predictor = HttpPredictor::new(
                endpoint,
                Duration::from_secs(config.endpoint.request_timeout_secs),
            )?;

            let series = read_entity_series(&config.dataset.path, &config.dataset.schema)
                .with_context(|| format!("reading {}", config.dataset.path.display()))?;

            let window = config.batching.window()?;
            let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
            let summary = run_forecast(&series, &window, &predictor, &output_dir)?;

            println!(
                "forecast complete: {} examples in {} batches -> {}",
                summary.examples,
                summary.batches,
                output_dir.display()
            );
            if let Some(metrics) = summary.raw_accuracy {
                println!(
                    "  without covariates: mae {:.4}  rmse {:.4}  smape {:.2}%",
                    metrics.mae, metrics.rmse, metrics.smape
                );
            }
            if let Some(metrics) = summary.covariate_accuracy {
                println!(
                    "  with covariates:    mae {:.4}  rmse {:.4}  smape {:.2}%",
                    metrics.mae, metrics.rmse, metrics.smape
                );
            }
        }
        Commands::Endpoints => {
            let registry = EndpointRegistry::load(&config.endpoint.registry)?;
            if registry.is_empty() {
                println!("no endpoints registered in {}", config.endpoint.registry.display());
            }
            for endpoint in registry.list() {
                println!("{endpoint}");
            }
        }
        Commands::Health => {
            let registry = EndpointRegistry::load(&config.endpoint.registry)?;
            let endpoint = registry.first()?;
            let predictor = HttpPredictor::new(
                endpoint,
                Duration::from_secs(config.endpoint.request_timeout_secs),
            )?;
            predictor.health()?;
            println!("{endpoint} is healthy");
        }
    }

    Ok(())
}
