//! Job domain types

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Flavour of an analysis job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisVariant {
    /// ARIMA forecast plus Reddit sentiment
    Simple,
    /// ARIMA + LSTM forecast with FinBERT sentiment
    Hybrid,
}

impl AnalysisVariant {
    /// Value sent as the `analysis_type` form field
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisVariant::Simple => "simple",
            AnalysisVariant::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for AnalysisVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of backend work a job performs
///
/// The kind selects the submit route, the result route and the maximum wait time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobKind {
    Analysis(AnalysisVariant),
    Backtest,
}

impl JobKind {
    /// Lower-case noun used inside user-facing messages ("analysis", "backtesting")
    pub fn noun(&self) -> &'static str {
        match self {
            JobKind::Analysis(_) => "analysis",
            JobKind::Backtest => "backtesting",
        }
    }

    /// Capitalised noun used at the start of user-facing messages
    pub fn title(&self) -> &'static str {
        match self {
            JobKind::Analysis(_) => "Analysis",
            JobKind::Backtest => "Backtesting",
        }
    }

    /// The analysis variant, if this is an analysis job
    pub fn variant(&self) -> Option<AnalysisVariant> {
        match self {
            JobKind::Analysis(variant) => Some(*variant),
            JobKind::Backtest => None,
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Analysis(variant) => write!(f, "analysis/{}", variant),
            JobKind::Backtest => f.write_str("backtest"),
        }
    }
}

/// A request to run one job for one ticker symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    pub ticker: String,
    pub kind: JobKind,
}

impl JobRequest {
    /// Creates a request; the ticker is upper-cased because results are stored
    /// under the upper-cased symbol.
    pub fn new(ticker: impl AsRef<str>, kind: JobKind) -> Self {
        Self {
            ticker: ticker.as_ref().trim().to_ascii_uppercase(),
            kind,
        }
    }

    pub fn analysis(ticker: impl AsRef<str>, variant: AnalysisVariant) -> Self {
        Self::new(ticker, JobKind::Analysis(variant))
    }

    pub fn backtest(ticker: impl AsRef<str>) -> Self {
        Self::new(ticker, JobKind::Backtest)
    }
}

/// Reasons a ticker symbol is refused before submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TickerError {
    #[error("ticker symbol must not be empty")]
    Empty,

    #[error("ticker symbol must be 2 to 5 characters long, got {0}")]
    Length(usize),

    #[error("ticker symbol must be alphanumeric: {0}")]
    NotAlphanumeric(String),
}

/// Validates a ticker symbol the same way the backend does
///
/// Callers are expected to run this before submitting; the monitor itself
/// does not validate.
pub fn validate_ticker(ticker: &str) -> Result<(), TickerError> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(TickerError::Empty);
    }
    if !ticker.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(TickerError::NotAlphanumeric(ticker.to_string()));
    }
    let len = ticker.chars().count();
    if !(2..=5).contains(&len) {
        return Err(TickerError::Length(len));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_normalizes_ticker() {
        let req = JobRequest::analysis(" aapl ", AnalysisVariant::Simple);
        assert_eq!(req.ticker, "AAPL");
        assert_eq!(req.kind, JobKind::Analysis(AnalysisVariant::Simple));
    }

    #[test]
    fn test_kind_nouns() {
        assert_eq!(JobKind::Analysis(AnalysisVariant::Hybrid).noun(), "analysis");
        assert_eq!(JobKind::Backtest.title(), "Backtesting");
        assert_eq!(JobKind::Backtest.variant(), None);
        assert_eq!(
            JobKind::Analysis(AnalysisVariant::Hybrid).to_string(),
            "analysis/hybrid"
        );
    }

    #[test]
    fn test_validate_ticker() {
        assert!(validate_ticker("AAPL").is_ok());
        assert!(validate_ticker("ms").is_ok());
        assert_eq!(validate_ticker("  "), Err(TickerError::Empty));
        assert_eq!(validate_ticker("A"), Err(TickerError::Length(1)));
        assert_eq!(validate_ticker("TOOLONG"), Err(TickerError::Length(7)));
        assert!(matches!(
            validate_ticker("BRK.B"),
            Err(TickerError::NotAlphanumeric(_))
        ));
    }
}
