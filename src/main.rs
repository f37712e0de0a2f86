//! Salesboard main entry point

use anyhow::Context;
use clap::Parser;
use salesboard_api::start_server;
use salesboard_config::{Config, ConfigError};
use salesboard_core::{source, MemoryStore, SeedSource, TransactionEngine};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "salesboard")]
#[command(version = "0.1.0")]
#[command(about = "Monthly sales transaction reporting backend", long_about = None)]
struct Args {
    /// Configuration file path; must exist when given (falls back to config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the default configuration file and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.print_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let rt = Runtime::new()?;
    rt.block_on(run(args))
}

async fn run(args: Args) -> anyhow::Result<()> {
    let (mut config, path, found) = Config::load_for_startup(args.config.as_deref())
        .await
        .map_err(config_error)?;
    config
        .apply_env_overrides(|key| std::env::var(key).ok())
        .map_err(config_error)?;

    init_logging(&config.logging.level);
    if found {
        log::info!("Config loaded from {}", path.display());
    } else {
        log::warn!("Config file not found: {}, using defaults", path.display());
    }

    let store = MemoryStore::open(config.store.snapshot_path.clone())
        .await
        .context("Failed to open record store")?;
    log::info!("Record store ready with {} records", store.len().await);

    let seed_source = source::from_config(&config.source).context("Failed to build seed source")?;
    log::info!("Seed source: {}", seed_source.describe());

    let engine = TransactionEngine::new(Arc::new(store), seed_source, config.pagination.clone());
    start_server(&config, engine).await.context("Server error")?;
    Ok(())
}

/// Startup config failures are reported with their code and suggestions
fn config_error(err: ConfigError) -> anyhow::Error {
    anyhow::anyhow!("{}", err.to_details())
}

/// `RUST_LOG` wins over the configured level
fn init_logging(level: &str) {
    let mut builder = env_logger::Builder::new();
    match std::env::var("RUST_LOG") {
        Ok(filters) => builder.parse_filters(&filters),
        Err(_) => builder.parse_filters(level),
    };
    builder.init();
}
