//! Status poller
//!
//! Checks a task's status at a fixed cadence until it reaches a terminal
//! outcome, the session deadline passes, or the session is cancelled.
//! Exactly one status request is in flight at a time.

use beacon_core::domain::job::JobRequest;
use std::sync::Arc;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::JobError;
use crate::handoff;
use crate::interpreter::{Classification, interpret};
use crate::monitor::Shared;
use crate::repository::JobRepository;
use crate::scheduler::session::{PollSession, TimeoutGuard};
use crate::state::JobState;

/// Periodic status checker for one poll session
pub(crate) struct PollScheduler {
    repository: Arc<dyn JobRepository>,
    shared: Arc<Shared>,
    request: JobRequest,
    job_id: String,
    generation: u64,
    guard: TimeoutGuard,
    cadence: Duration,
    token: CancellationToken,
}

impl PollScheduler {
    /// Builds the checker that runs on behalf of `session`
    pub(crate) fn for_session(
        session: &PollSession,
        repository: Arc<dyn JobRepository>,
        shared: Arc<Shared>,
        request: JobRequest,
    ) -> Self {
        Self {
            repository,
            shared,
            request,
            job_id: session.job_id().to_string(),
            generation: session.generation(),
            guard: session.guard(),
            cadence: session.cadence(),
            token: session.token(),
        }
    }

    /// Runs the polling loop to completion
    pub(crate) async fn run(self) {
        info!(
            "Polling task {} every {:?} ({} job for {})",
            self.job_id, self.cadence, self.request.kind, self.request.ticker
        );

        // First check one cadence after polling starts
        let mut interval = time::interval_at(self.guard.started_at() + self.cadence, self.cadence);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut polls: u32 = 0;

        loop {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => {
                    debug!("Poll session for task {} cancelled", self.job_id);
                    return;
                }
                _ = interval.tick() => {}
            }

            if self.guard.expired(Instant::now()) {
                warn!(
                    "Task {} exceeded its deadline after {} poll(s)",
                    self.job_id, polls
                );
                self.apply(JobState::TimedOut(self.request.kind));
                return;
            }

            polls += 1;
            debug!("Checking status of task {} (poll #{})", self.job_id, polls);

            // The interval keeps ticking while the request is in flight so the
            // deadline still holds against a backend that never answers
            let status = self.repository.poll_status(&self.job_id);
            tokio::pin!(status);
            let response = loop {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => {
                        debug!("Dropping in-flight status check for cancelled task {}", self.job_id);
                        return;
                    }
                    response = &mut status => break response,
                    _ = interval.tick() => {
                        if self.guard.expired(Instant::now()) {
                            warn!(
                                "Task {} exceeded its deadline with a status check still in flight",
                                self.job_id
                            );
                            self.apply(JobState::TimedOut(self.request.kind));
                            return;
                        }
                        debug!("Status check for task {} still in flight", self.job_id);
                    }
                }
            };

            let classification = match response {
                Ok(status) => interpret(self.request.kind, status),
                Err(e) => {
                    warn!("Status check for task {} failed: {:#}", self.job_id, e);
                    Classification::Failed(JobError::PollTransport {
                        kind: self.request.kind,
                    })
                }
            };

            match classification {
                Classification::Waiting => {}
                Classification::Progress(message) => {
                    debug!("Task {} progress: {}", self.job_id, message);
                    self.apply(JobState::Progressing(message));
                }
                Classification::Completed(result) => {
                    info!("Task {} succeeded after {} poll(s)", self.job_id, polls);
                    self.apply(JobState::Succeeded(result));
                    return;
                }
                Classification::Failed(error) => {
                    warn!("Task {} failed: {}", self.job_id, error);
                    self.apply(JobState::Failed(error));
                    return;
                }
                Classification::FetchResult => break,
            }
        }

        // No ticks past this point
        drop(interval);
        info!(
            "Task {} succeeded after {} poll(s), fetching result",
            self.job_id, polls
        );
        if !self.apply(JobState::FetchingResult) {
            return;
        }

        let outcome = tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                debug!("Dropping result fetch for cancelled task {}", self.job_id);
                return;
            }
            outcome = handoff::fetch_output(self.repository.as_ref(), &self.request) => outcome,
        };

        match outcome {
            Ok(result) => self.apply(JobState::Succeeded(result)),
            Err(error) => self.apply(JobState::Failed(error)),
        };
    }

    fn apply(&self, next: JobState) -> bool {
        self.shared.transition(self.generation, next)
    }
}
