//! State interpreter
//!
//! Maps one status-check response onto what the scheduler should do next.
//! Pure: no I/O, no state.

use beacon_core::domain::job::JobKind;
use beacon_core::domain::task::TaskState;
use beacon_core::dto::job::StatusResponse;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::JobError;

/// Outcome of interpreting one status response
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Nothing new; keep polling
    Waiting,
    /// Still running, with progress text
    Progress(String),
    /// Finished; the output must be fetched separately
    FetchResult,
    /// Finished with the output embedded in the status payload
    Completed(JsonValue),
    /// Terminal failure
    Failed(JobError),
}

/// Classifies a status response for a job of the given kind
pub fn interpret(kind: JobKind, response: StatusResponse) -> Classification {
    match response.state {
        TaskState::Pending => {
            debug!("Task still pending");
            Classification::Waiting
        }
        TaskState::Progress => Classification::Progress(response.status.unwrap_or_default()),
        TaskState::Success => match kind {
            JobKind::Analysis(_) => Classification::FetchResult,
            JobKind::Backtest => match response.result.map(unwrap_nested_result) {
                Some(result) => Classification::Completed(result),
                None => {
                    warn!("Backtest reported SUCCESS without a result payload");
                    Classification::Failed(JobError::PollTransport { kind })
                }
            },
        },
        TaskState::Failure => {
            Classification::Failed(JobError::job_failure(kind, response.status.as_deref()))
        }
        TaskState::Unknown(raw) => {
            // Intermediate states (STARTED, RETRY, ...) are tolerated, but surfaced
            warn!("Ignoring unrecognized task state {:?}", raw);
            Classification::Waiting
        }
    }
}

/// The status endpoint may wrap the task's return value, which itself carries
/// the metrics under `result`; unwrap one level when that is the case.
fn unwrap_nested_result(result: JsonValue) -> JsonValue {
    match result {
        JsonValue::Object(mut map) if map.get("result").is_some_and(JsonValue::is_object) => {
            map.remove("result").unwrap_or(JsonValue::Null)
        }
        other => other,
    }
}
