//! Result rendering
//!
//! Turns the JSON payload of a finished job into terminal output. Payloads
//! that do not match the expected shape are printed as pretty JSON.

use anyhow::{Context, Result};
use beacon_core::domain::result::{AnalysisData, BacktestMetrics, HybridData, RedditPost};
use colored::*;
use serde_json::Value as JsonValue;
use std::path::Path;

/// Posts shown in the sentiment table
const MAX_POSTS: usize = 10;

/// Render a simple analysis payload
pub fn render_analysis(data: &JsonValue) -> String {
    match serde_json::from_value::<AnalysisData>(data.clone()) {
        Ok(analysis) => format_analysis(&analysis),
        Err(_) => format_raw(data),
    }
}

/// Render a hybrid analysis payload
pub fn render_hybrid(data: &JsonValue) -> String {
    match serde_json::from_value::<HybridData>(data.clone()) {
        Ok(hybrid) if hybrid.hybrid_plot.is_some() => {
            format!("{}", "Hybrid forecast plot received.".bold())
        }
        Ok(_) => format!("{}", "No hybrid plot available.".yellow()),
        Err(_) => format_raw(data),
    }
}

/// Render a backtest payload
pub fn render_backtest(data: &JsonValue) -> String {
    match serde_json::from_value::<BacktestMetrics>(data.clone()) {
        Ok(metrics) => format_backtest(&metrics),
        Err(_) => format_raw(data),
    }
}

/// The plot HTML carried by an analysis payload, if any
pub fn plot_html(data: &JsonValue) -> Option<&str> {
    data.get("arima_plot")
        .or_else(|| data.get("hybrid_plot"))
        .and_then(JsonValue::as_str)
        .filter(|html| !html.is_empty())
}

/// Write the plot HTML to `path`
pub fn write_plot(path: &Path, html: &str) -> Result<()> {
    std::fs::write(path, html)
        .with_context(|| format!("Failed to write plot to {}", path.display()))
}

fn format_analysis(analysis: &AnalysisData) -> String {
    let mut out = String::new();

    match analysis.sentiment {
        Some(score) => {
            let label = sentiment_label(score);
            out.push_str(&format!("  Sentiment: {:.2} ({})\n", score, label));
        }
        None => out.push_str(&format!("  Sentiment: {}\n", "n/a".dimmed())),
    }

    out.push_str(&format!(
        "  Forecast:  {}\n",
        if analysis.arima_plot.is_some() {
            "plot received".green()
        } else {
            "not available".yellow()
        }
    ));

    match analysis.posts.as_deref() {
        Some(posts) if !posts.is_empty() => {
            out.push('\n');
            out.push_str(&format!("{}\n", "Reddit posts:".bold()));
            for post in posts.iter().take(MAX_POSTS) {
                out.push_str(&format_post(post));
            }
            if posts.len() > MAX_POSTS {
                out.push_str(&format!(
                    "  {}\n",
                    format!("... and {} more", posts.len() - MAX_POSTS).dimmed()
                ));
            }
        }
        _ => out.push_str(&format!("  {}\n", "No Reddit posts found.".dimmed())),
    }

    out
}

fn format_post(post: &RedditPost) -> String {
    let sentiment = match post.sentiment.as_str() {
        "Positive" => post.sentiment.green(),
        "Negative" => post.sentiment.red(),
        _ => post.sentiment.normal(),
    };
    format!(
        "  {} {} [{}] {}\n    {}\n",
        "▸".cyan(),
        post.title,
        sentiment,
        format!("score {}", post.score).dimmed(),
        post.url.dimmed()
    )
}

fn format_backtest(metrics: &BacktestMetrics) -> String {
    format!(
        "{}\n  {:<6} MAE {:>10.4}  RMSE {:>10.4}\n  {:<6} MAE {:>10.4}  RMSE {:>10.4}\n",
        "Backtest metrics:".bold(),
        "ARIMA",
        metrics.arima_mae,
        metrics.arima_rmse,
        "LSTM",
        metrics.lstm_mae,
        metrics.lstm_rmse
    )
}

fn format_raw(data: &JsonValue) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
}

fn sentiment_label(score: f64) -> &'static str {
    if score > 0.05 {
        "positive"
    } else if score < -0.05 {
        "negative"
    } else {
        "neutral"
    }
}
