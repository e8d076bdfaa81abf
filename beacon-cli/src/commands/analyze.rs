//! Analyze command handler

use anyhow::Result;
use beacon_core::domain::job::{AnalysisVariant, JobRequest};
use colored::*;
use std::path::Path;

use super::job::follow_job;
use crate::config::Config;
use crate::render;

/// Run an analysis job and print its result
pub async fn handle_analyze(
    ticker: &str,
    hybrid: bool,
    plot_out: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let variant = if hybrid {
        AnalysisVariant::Hybrid
    } else {
        AnalysisVariant::Simple
    };
    let request = JobRequest::analysis(ticker, variant);
    let ticker = request.ticker.clone();

    let data = follow_job(request, config).await?;

    println!();
    println!("{}", format!("Analysis for {}:", ticker).bold());
    match variant {
        AnalysisVariant::Simple => print!("{}", render::render_analysis(&data)),
        AnalysisVariant::Hybrid => println!("  {}", render::render_hybrid(&data)),
    }

    if let Some(path) = plot_out {
        match render::plot_html(&data) {
            Some(html) => {
                render::write_plot(path, html)?;
                println!("  Plot:      {}", path.display().to_string().cyan());
            }
            None => println!("  {}", "No plot to write.".yellow()),
        }
    }

    Ok(())
}
