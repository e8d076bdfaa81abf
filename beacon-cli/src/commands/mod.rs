//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod analyze;
mod backtest;
mod job;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run a stock analysis and wait for its result
    Analyze {
        /// Ticker symbol (e.g., AAPL)
        ticker: String,

        /// Run the hybrid ARIMA + LSTM analysis instead of the simple one
        #[arg(long)]
        hybrid: bool,

        /// Write the forecast plot (HTML) to this file
        #[arg(long)]
        plot_out: Option<PathBuf>,
    },
    /// Backtest the forecasting models on a ticker
    Backtest {
        /// Ticker symbol (e.g., MSFT)
        ticker: String,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Analyze {
            ticker,
            hybrid,
            plot_out,
        } => analyze::handle_analyze(&ticker, hybrid, plot_out.as_deref(), config).await,
        Commands::Backtest { ticker } => backtest::handle_backtest(&ticker, config).await,
    }
}
