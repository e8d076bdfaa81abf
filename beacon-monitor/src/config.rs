//! Monitor configuration
//!
//! Defines the backend location, the poll cadence and the per-kind maximum
//! wait times used by the job monitor.

use beacon_core::domain::job::{AnalysisVariant, JobKind};
use std::time::Duration;

/// Default interval between two status checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5_000);

/// Default maximum wait for a simple analysis
pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_millis(180_000);

/// Default maximum wait for a hybrid analysis
pub const DEFAULT_HYBRID_TIMEOUT: Duration = Duration::from_millis(300_000);

/// Default maximum wait for a backtest
pub const DEFAULT_BACKTEST_TIMEOUT: Duration = Duration::from_millis(600_000);

/// Monitor configuration
///
/// The defaults reproduce the backend's expected client behaviour; the
/// environment overrides exist for slow deployments and for tests.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Backend base URL (e.g., "http://localhost:5000")
    pub backend_url: String,

    /// How often to poll the status endpoint
    pub poll_interval: Duration,

    /// Maximum wait for `analysis` + `simple`
    pub analysis_simple_timeout: Duration,

    /// Maximum wait for `analysis` + `hybrid`
    pub analysis_hybrid_timeout: Duration,

    /// Maximum wait for `backtest`
    pub backtest_timeout: Duration,

    /// Per-request HTTP timeout; `None` leaves requests unbounded
    pub request_timeout: Option<Duration>,
}

impl MonitorConfig {
    /// Creates a new configuration with defaults
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            analysis_simple_timeout: DEFAULT_ANALYSIS_TIMEOUT,
            analysis_hybrid_timeout: DEFAULT_HYBRID_TIMEOUT,
            backtest_timeout: DEFAULT_BACKTEST_TIMEOUT,
            request_timeout: None,
        }
    }

    /// Creates configuration for `backend_url`, applying environment overrides
    ///
    /// Recognised environment variables:
    /// - POLL_INTERVAL_MS (optional, default: 5000)
    /// - ANALYSIS_TIMEOUT_MS (optional, default: 180000)
    /// - HYBRID_TIMEOUT_MS (optional, default: 300000)
    /// - BACKTEST_TIMEOUT_MS (optional, default: 600000)
    /// - REQUEST_TIMEOUT_SECS (optional, unset by default)
    pub fn from_env(backend_url: impl Into<String>) -> Self {
        let mut config = Self::new(backend_url);

        if let Some(ms) = env_u64("POLL_INTERVAL_MS") {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = env_u64("ANALYSIS_TIMEOUT_MS") {
            config.analysis_simple_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = env_u64("HYBRID_TIMEOUT_MS") {
            config.analysis_hybrid_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = env_u64("BACKTEST_TIMEOUT_MS") {
            config.backtest_timeout = Duration::from_millis(ms);
        }
        config.request_timeout = env_u64("REQUEST_TIMEOUT_SECS").map(Duration::from_secs);

        config
    }

    /// Sets the poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Maximum wait for a job of the given kind
    pub fn timeout_for(&self, kind: &JobKind) -> Duration {
        match kind {
            JobKind::Analysis(AnalysisVariant::Simple) => self.analysis_simple_timeout,
            JobKind::Analysis(AnalysisVariant::Hybrid) => self.analysis_hybrid_timeout,
            JobKind::Backtest => self.backtest_timeout,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backend_url.is_empty() {
            anyhow::bail!("backend_url cannot be empty");
        }

        if !self.backend_url.starts_with("http://") && !self.backend_url.starts_with("https://") {
            anyhow::bail!("backend_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        for (name, timeout) in [
            ("analysis_simple_timeout", self.analysis_simple_timeout),
            ("analysis_hybrid_timeout", self.analysis_hybrid_timeout),
            ("backtest_timeout", self.backtest_timeout),
        ] {
            if timeout < self.poll_interval {
                anyhow::bail!("{} must not be shorter than poll_interval", name);
            }
        }

        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new("http://localhost:5000")
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|s| s.parse::<u64>().ok())
}
