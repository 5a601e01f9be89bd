//! Packwise Server CLI
//!
//! Starts the packing-list HTTP server.

use anyhow::Context;
use clap::Parser;
use packwise_server::{config::ServerConfig, start_server};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Packwise - travel packing lists grounded in web sources
#[derive(Debug, Parser)]
#[command(name = "packwise-server")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Load configuration from a TOML file instead of the environment
    #[arg(short, long, env = "PACKWISE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::from_env().context("loading configuration from environment")?,
    };

    start_server(config).await?;
    Ok(())
}
