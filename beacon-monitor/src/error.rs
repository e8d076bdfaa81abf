//! Terminal failure reasons
//!
//! Every way a monitored job can fail ends in one of these variants. The
//! `Display` output is the user-facing message.

use beacon_core::domain::job::JobKind;
use thiserror::Error;

/// Why a job ended without a result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    /// The backend refused the submission and said why
    #[error("{0}")]
    Rejected(String),

    /// No job identifier could be obtained (transport failure or unusable answer)
    #[error("Failed to start {}. Please try again.", .kind.noun())]
    Submission { kind: JobKind },

    /// A status check failed at the network layer or returned garbage
    #[error("Failed to get {} status.", .kind.noun())]
    PollTransport { kind: JobKind },

    /// The backend reported `FAILURE` for a started job
    #[error("{message}")]
    JobFailure { message: String },

    /// The job did not reach a terminal state within its deadline
    #[error("{} timed out. Please ensure backend services are running and try again.", .kind.title())]
    Timeout { kind: JobKind },

    /// The job succeeded but its output could not be retrieved
    #[error("Failed to fetch {} data.", .kind.noun())]
    ResultFetch { kind: JobKind },
}

impl JobError {
    /// Builds a `JobFailure`, using the backend text when it has any
    pub fn job_failure(kind: JobKind, status: Option<&str>) -> Self {
        let message = match status.map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => format!("{} failed. Please try again.", kind.title()),
        };
        JobError::JobFailure { message }
    }

    /// True when the backend job itself finished successfully
    pub fn job_succeeded(&self) -> bool {
        matches!(self, JobError::ResultFetch { .. })
    }
}
