//! Job following
//!
//! Drives a job monitor for one request and prints its progress until the
//! job reaches a terminal state.

use anyhow::{Result, bail};
use beacon_core::domain::job::{JobRequest, validate_ticker};
use beacon_monitor::{HttpJobRepository, JobMonitor, JobState};
use colored::*;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::Config;

/// Submit `request` and wait for its result
///
/// Fails with the user-facing message when the job fails, times out, or the
/// user interrupts it.
pub async fn follow_job(request: JobRequest, config: &Config) -> Result<JsonValue> {
    validate_ticker(&request.ticker)?;

    let repository = Arc::new(HttpJobRepository::from_config(&config.monitor)?);
    let monitor = JobMonitor::new(repository, config.monitor.clone())?;

    println!(
        "{} {} job for {}",
        "▸".cyan(),
        request.kind.title(),
        request.ticker.bold()
    );

    let progress = tokio::spawn(print_progress(monitor.subscribe()));

    let state = tokio::select! {
        state = monitor.run(request) => state,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, cancelling job");
            monitor.cancel();
            JobState::Idle
        }
    };

    // Ends on its own once the state is terminal or idle
    join_printer(progress).await;

    match state {
        JobState::Succeeded(data) => Ok(data),
        JobState::Idle => bail!("Cancelled"),
        other => match other.error() {
            Some(error) => bail!("{}", error),
            None => bail!("Job ended in unexpected state {:?}", other),
        },
    }
}

/// Prints each published state change until the job settles
async fn print_progress(mut rx: watch::Receiver<JobState>) {
    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        if let Some(line) = describe(&state) {
            println!(
                "{} {}",
                chrono::Local::now().format("%H:%M:%S").to_string().dimmed(),
                line
            );
        }
        if state.is_terminal() || state == JobState::Idle {
            break;
        }
    }
}

/// Waits for the progress printer, reporting a panic instead of propagating it
async fn join_printer(progress: JoinHandle<()>) -> bool {
    match progress.await {
        Ok(()) => true,
        Err(e) => {
            warn!("Progress printer stopped unexpectedly: {}", e);
            false
        }
    }
}

/// One-line description of a state, if it is worth printing
fn describe(state: &JobState) -> Option<ColoredString> {
    match state {
        JobState::Idle => None,
        JobState::Submitting => Some("Submitting...".dimmed()),
        JobState::Polling => Some("Waiting for the backend...".dimmed()),
        JobState::Progressing(message) if message.is_empty() => None,
        JobState::Progressing(message) => Some(message.as_str().cyan()),
        JobState::FetchingResult => Some("Fetching result...".dimmed()),
        JobState::Succeeded(_) => Some("✓ Done".green()),
        JobState::Failed(error) => Some(format!("✗ {}", error).red()),
        JobState::TimedOut(_) => Some("✗ Timed out".red()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::domain::job::JobKind;
    use beacon_monitor::JobError;

    #[test]
    fn test_describe_skips_idle_and_empty_progress() {
        assert!(describe(&JobState::Idle).is_none());
        assert!(describe(&JobState::Progressing(String::new())).is_none());
        assert!(describe(&JobState::Progressing("Fetching stock data...".into())).is_some());
    }

    #[test]
    fn test_describe_fetching_result() {
        let line = describe(&JobState::FetchingResult).unwrap();
        assert!(line.to_string().contains("Fetching result..."));
    }

    #[tokio::test]
    async fn test_join_printer_reports_panic() {
        let finished = tokio::spawn(async {});
        assert!(join_printer(finished).await);

        let panicked = tokio::spawn(async { panic!("printer failed") });
        assert!(!join_printer(panicked).await);
    }

    #[test]
    fn test_describe_failure_uses_message() {
        let line = describe(&JobState::Failed(JobError::PollTransport {
            kind: JobKind::Backtest,
        }))
        .unwrap();
        assert!(line.to_string().contains("Failed to get backtesting status."));
    }

    #[tokio::test]
    async fn test_invalid_ticker_is_refused_before_submitting() {
        let config = Config::load("http://127.0.0.1:9".to_string()).unwrap();

        let err = follow_job(JobRequest::backtest("TOOLONG"), &config)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("2 to 5 characters"));
    }
}
