//! Configuration module
//!
//! Builds the monitor configuration from the command line and environment.

use anyhow::{Context, Result};
use beacon_monitor::MonitorConfig;
use tracing::debug;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Settings handed to the job monitor
    pub monitor: MonitorConfig,
}

impl Config {
    /// Loads configuration for `backend_url`, applying environment overrides
    pub fn load(backend_url: String) -> Result<Self> {
        let monitor = MonitorConfig::from_env(backend_url);
        monitor.validate().context("Invalid configuration")?;
        debug!("Loaded configuration: {:?}", monitor);

        Ok(Self { monitor })
    }
}
