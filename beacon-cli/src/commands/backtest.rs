//! Backtest command handler

use anyhow::Result;
use beacon_core::domain::job::JobRequest;
use colored::*;

use super::job::follow_job;
use crate::config::Config;
use crate::render;

/// Run a backtest job and print the error metrics
pub async fn handle_backtest(ticker: &str, config: &Config) -> Result<()> {
    let request = JobRequest::backtest(ticker);
    let ticker = request.ticker.clone();

    let data = follow_job(request, config).await?;

    println!();
    println!("{}", format!("Backtest for {}:", ticker).bold());
    print!("{}", render::render_backtest(&data));

    Ok(())
}
