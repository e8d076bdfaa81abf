//! Beacon CLI
//!
//! Command-line interface for running stock analyses and backtests against
//! the analysis backend and following them until they finish.

mod commands;
mod config;
mod render;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "beacon")]
#[command(about = "Run stock analyses and backtests and wait for their results", long_about = None)]
struct Cli {
    /// Analysis backend URL
    #[arg(long, env = "BEACON_BACKEND_URL", default_value = "http://localhost:5000")]
    backend_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with rendered results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beacon_cli=info,beacon_monitor=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.backend_url)?;

    handle_command(cli.command, &config).await
}
