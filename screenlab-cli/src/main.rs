//! ScreenLab CLI — validate and run screening configs.
//!
//! Commands:
//! - `run` — execute a screen from a TOML config over a directory of
//!   per-symbol CSV bar files, emitting the summary as JSON
//! - `validate` — parse and validate a config, echoing its run id

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use screenlab_core::filters::{build_filter, ScreenFilter};
use screenlab_runner::{load_universe, EngineConfig, ScreenConfig, ScreenerEngine};

#[derive(Parser)]
#[command(name = "screenlab", about = "ScreenLab CLI — stock screening engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a screen from a TOML config file.
    Run {
        /// Path to a TOML screen config.
        #[arg(long)]
        config: PathBuf,

        /// Directory of per-symbol CSV bar files (SYMBOL.csv).
        #[arg(long, default_value = "data")]
        data: PathBuf,

        /// Write the JSON summary here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON summary.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Parse and validate a config, echoing its run id.
    Validate {
        /// Path to a TOML screen config.
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            data,
            output,
            pretty,
        } => run(&config, &data, output.as_deref(), pretty),
        Commands::Validate { config } => validate(&config),
    }
}

fn run(
    config_path: &std::path::Path,
    data_dir: &std::path::Path,
    output: Option<&std::path::Path>,
    pretty: bool,
) -> Result<()> {
    let config = ScreenConfig::load(config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    config.validate().context("invalid config")?;
    info!(run_id = %config.run_id(), symbols = config.universe.len(), "starting screen");

    let filters = config
        .filters
        .iter()
        .map(build_filter)
        .collect::<Result<Vec<Arc<dyn ScreenFilter>>, _>>()
        .context("building filters")?;

    let universe = load_universe(data_dir, &config.universe)
        .with_context(|| format!("loading bars from {}", data_dir.display()))?;

    let engine_config = match config.workers {
        Some(workers) => EngineConfig { workers },
        None => EngineConfig::default(),
    };
    let engine = ScreenerEngine::new(engine_config)?;
    let summary = engine.screen_with_metrics(
        &universe,
        &filters,
        config.date_range(),
        &config.aggregations,
    )?;

    let json = if pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("writing summary to {}", path.display()))?;
            info!(path = %path.display(), "summary written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn validate(config_path: &std::path::Path) -> Result<()> {
    let config = ScreenConfig::load(config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    config.validate().context("invalid config")?;
    println!("ok: run_id {}", config.run_id());
    Ok(())
}
