//! Job state as published by the monitor

use beacon_core::domain::job::JobKind;

use crate::error::JobError;

/// The monitor's view of one submission
///
/// Within a session the state only moves forward:
/// `Idle -> Submitting -> Polling <-> Progressing -> FetchingResult -> terminal`,
/// or `Submitting -> terminal` when no polling is needed. `Succeeded`,
/// `Failed` and `TimedOut` are terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    Idle,
    Submitting,
    Polling,
    Progressing(String),
    /// The task finished; its output is being fetched
    FetchingResult,
    Succeeded(serde_json::Value),
    Failed(JobError),
    TimedOut(JobKind),
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Succeeded(_) | JobState::Failed(_) | JobState::TimedOut(_)
        )
    }

    /// Whether a session may move from `self` to `next`
    pub fn can_transition_to(&self, next: &JobState) -> bool {
        use JobState::*;

        match (self, next) {
            (Idle, Submitting) => true,
            (Submitting, Polling | FetchingResult | Succeeded(_) | Failed(_)) => true,
            (
                Polling | Progressing(_),
                Progressing(_) | FetchingResult | Succeeded(_) | Failed(_) | TimedOut(_),
            ) => true,
            (FetchingResult, Succeeded(_) | Failed(_)) => true,
            _ => false,
        }
    }

    /// Progress text, while progressing
    pub fn progress(&self) -> Option<&str> {
        match self {
            JobState::Progressing(message) => Some(message),
            _ => None,
        }
    }

    /// The failure behind a `Failed` or `TimedOut` state
    pub fn error(&self) -> Option<JobError> {
        match self {
            JobState::Failed(error) => Some(error.clone()),
            JobState::TimedOut(kind) => Some(JobError::Timeout { kind: *kind }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_terminal_states() {
        assert!(JobState::Succeeded(json!({})).is_terminal());
        assert!(JobState::Failed(JobError::Rejected("no".into())).is_terminal());
        assert!(JobState::TimedOut(JobKind::Backtest).is_terminal());
        assert!(!JobState::Progressing("x".into()).is_terminal());
        assert!(!JobState::Idle.is_terminal());
    }

    #[test]
    fn test_forward_transitions() {
        assert!(JobState::Idle.can_transition_to(&JobState::Submitting));
        assert!(JobState::Submitting.can_transition_to(&JobState::Polling));
        assert!(JobState::Submitting.can_transition_to(&JobState::Succeeded(json!(1))));
        assert!(JobState::Polling.can_transition_to(&JobState::Progressing("a".into())));
        assert!(
            JobState::Progressing("a".into()).can_transition_to(&JobState::Progressing("b".into()))
        );
        assert!(JobState::Progressing("a".into()).can_transition_to(&JobState::TimedOut(
            JobKind::Backtest
        )));
    }

    #[test]
    fn test_no_transition_leaves_terminal() {
        let done = JobState::Succeeded(json!({}));
        assert!(!done.can_transition_to(&JobState::Polling));
        assert!(!done.can_transition_to(&JobState::Failed(JobError::Rejected("late".into()))));
        assert!(!JobState::TimedOut(JobKind::Backtest).can_transition_to(&JobState::Succeeded(json!({}))));
    }

    #[test]
    fn test_no_backward_transitions() {
        assert!(!JobState::Polling.can_transition_to(&JobState::Submitting));
        assert!(!JobState::Submitting.can_transition_to(&JobState::TimedOut(JobKind::Backtest)));
        assert!(!JobState::Idle.can_transition_to(&JobState::Polling));
    }

    #[test]
    fn test_fetching_result_clears_progress() {
        let progressing = JobState::Progressing("fetching prices".into());
        assert!(progressing.can_transition_to(&JobState::FetchingResult));
        assert_eq!(JobState::FetchingResult.progress(), None);
        assert!(!JobState::FetchingResult.is_terminal());
        assert!(JobState::FetchingResult.can_transition_to(&JobState::Succeeded(json!({}))));
        assert!(!JobState::FetchingResult.can_transition_to(&JobState::Progressing("x".into())));
        assert!(!JobState::FetchingResult.can_transition_to(&JobState::Polling));
    }

    #[test]
    fn test_timed_out_error_message() {
        let error = JobState::TimedOut(JobKind::Backtest).error().unwrap();
        assert_eq!(error, JobError::Timeout { kind: JobKind::Backtest });
    }
}
