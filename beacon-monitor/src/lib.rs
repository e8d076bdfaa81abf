//! Beacon Monitor
//!
//! Tracks a long-running analysis or backtest job on the backend without
//! blocking the caller.
//!
//! Architecture:
//! - Configuration: poll cadence and per-kind deadlines
//! - Repository: the three backend operations (submit, status, result)
//! - Interpreter: maps a status payload onto the next step
//! - Scheduler: the poll session and its periodic status checks
//! - Monitor: submission, cancellation and the published job state
//!
//! # Example
//!
//! ```no_run
//! use beacon_core::domain::job::{AnalysisVariant, JobRequest};
//! use beacon_monitor::{HttpJobRepository, JobMonitor, JobState, MonitorConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = MonitorConfig::new("http://localhost:5000");
//!     let repository = Arc::new(HttpJobRepository::from_config(&config)?);
//!     let monitor = JobMonitor::new(repository, config)?;
//!
//!     match monitor.run(JobRequest::analysis("AAPL", AnalysisVariant::Simple)).await {
//!         JobState::Succeeded(data) => println!("{}", data),
//!         other => eprintln!("{:?}", other.error()),
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handoff;
pub mod interpreter;
mod monitor;
pub mod repository;
pub mod scheduler;
pub mod state;

pub use config::MonitorConfig;
pub use error::JobError;
pub use monitor::JobMonitor;
pub use repository::{HttpJobRepository, JobRepository};
pub use state::JobState;
