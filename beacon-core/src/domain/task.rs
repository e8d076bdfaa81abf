//! Backend task state as reported by the status endpoint

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw state of a backend task
///
/// Only the four states the monitor acts on are named; anything else the
/// backend reports (e.g. `STARTED`, `RETRY`) is kept verbatim in `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskState {
    Pending,
    Progress,
    Success,
    Failure,
    Unknown(String),
}

impl TaskState {
    pub fn as_str(&self) -> &str {
        match self {
            TaskState::Pending => "PENDING",
            TaskState::Progress => "PROGRESS",
            TaskState::Success => "SUCCESS",
            TaskState::Failure => "FAILURE",
            TaskState::Unknown(raw) => raw,
        }
    }
}

impl From<String> for TaskState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PENDING" => TaskState::Pending,
            "PROGRESS" => TaskState::Progress,
            "SUCCESS" => TaskState::Success,
            "FAILURE" => TaskState::Failure,
            _ => TaskState::Unknown(raw),
        }
    }
}

impl From<TaskState> for String {
    fn from(state: TaskState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_states_deserialize() {
        let state: TaskState = serde_json::from_str("\"SUCCESS\"").unwrap();
        assert_eq!(state, TaskState::Success);
        let state: TaskState = serde_json::from_str("\"PROGRESS\"").unwrap();
        assert_eq!(state, TaskState::Progress);
    }

    #[test]
    fn test_unrecognized_state_is_preserved() {
        let state: TaskState = serde_json::from_str("\"RETRY\"").unwrap();
        assert_eq!(state, TaskState::Unknown("RETRY".to_string()));
        assert_eq!(serde_json::to_string(&state).unwrap(), "\"RETRY\"");
    }
}
