//! Job DTOs for the submit and status endpoints

use serde::{Deserialize, Serialize};

use crate::domain::task::TaskState;

/// Answer to a job submission
///
/// Exactly one of these shapes is expected:
/// - `{"task_id": "..."}` when a background task was started
/// - `{"task_id": null}` or `{"result": {...}}` when the answer is available immediately
/// - `{"error": "...", "message": "..."}` when the request was rejected
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SubmitResponse {
    /// Server-reported reason the submission was refused, if any
    ///
    /// The backend sends a generic `error` ("bad request") alongside a specific
    /// `message`; the specific one wins.
    pub fn rejection(&self) -> Option<String> {
        let message = self.message.as_deref().filter(|m| !m.is_empty());
        let error = self.error.as_deref().filter(|e| !e.is_empty());
        message.or(error).map(str::to_string)
    }

    /// Whether the backend answered with an error body, even a blank one
    pub fn is_error(&self) -> bool {
        self.error.is_some() || self.rejection().is_some()
    }

    /// Identifier of the started task, ignoring empty strings
    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Snapshot returned by `GET /status/{task_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub state: TaskState,
    /// Human-readable progress or failure text
    #[serde(default)]
    pub status: Option<String>,
    /// Result payload, only present for jobs that embed it in their status
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}
