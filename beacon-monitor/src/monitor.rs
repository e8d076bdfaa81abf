//! Job monitor
//!
//! Submits a job, hands its identifier to a poll session, and publishes the
//! resulting [`JobState`] through a watch channel.
//!
//! Every state change goes through [`Shared::transition`], which checks the
//! submission generation first. A new submission (or `cancel`) bumps the
//! generation and stops the current session under the same lock, so any
//! late answer from an older submission or session is ignored.

use anyhow::Result;
use beacon_core::domain::job::{JobKind, JobRequest};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::error::JobError;
use crate::handoff;
use crate::repository::JobRepository;
use crate::scheduler::{PollScheduler, PollSession, TimeoutGuard};
use crate::state::JobState;

/// State shared between the monitor and its poll task
pub(crate) struct Shared {
    inner: Mutex<Inner>,
    state_tx: watch::Sender<JobState>,
}

struct Inner {
    generation: u64,
    session: Option<PollSession>,
}

impl Shared {
    fn new() -> Self {
        let (state_tx, _) = watch::channel(JobState::Idle);
        Self {
            inner: Mutex::new(Inner {
                generation: 0,
                session: None,
            }),
            state_tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stops the current session, starts a new generation and publishes `state`
    fn supersede(&self, state: JobState) -> u64 {
        let mut inner = self.lock();
        if let Some(mut session) = inner.session.take() {
            info!(
                "Cancelling poll session for task {} (submission #{})",
                session.job_id(),
                session.generation()
            );
            session.stop();
        }
        inner.generation += 1;
        self.state_tx.send_replace(state);
        inner.generation
    }

    /// Installs the session built by `start` and publishes `Polling`
    ///
    /// Nothing is installed when `generation` has been superseded.
    fn install(&self, generation: u64, start: impl FnOnce() -> PollSession) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation {
            debug!("Not starting poll session for superseded submission #{}", generation);
            return false;
        }
        if !self.state_tx.borrow().can_transition_to(&JobState::Polling) {
            return false;
        }
        inner.session = Some(start());
        self.state_tx.send_replace(JobState::Polling);
        true
    }

    /// Applies `next` on behalf of submission `generation`
    ///
    /// Returns `false` when the submission is no longer current or the move is
    /// not a forward transition. A terminal transition stops the session
    /// before the new state becomes visible.
    pub(crate) fn transition(&self, generation: u64, next: JobState) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation {
            debug!("Ignoring update from superseded submission #{}", generation);
            return false;
        }

        let allowed = self.state_tx.borrow().can_transition_to(&next);
        if !allowed {
            warn!("Refusing out-of-order transition to {:?}", next);
            return false;
        }

        if next.is_terminal() {
            if let Some(mut session) = inner.session.take() {
                session.stop();
            }
        }

        self.state_tx.send_if_modified(|state| {
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        });
        true
    }
}

/// Tracks one job at a time from submission to a terminal state
///
/// Starting a new submission cancels whatever the monitor was tracking.
/// Consumers observe progress through [`JobMonitor::subscribe`]; they never
/// mutate the state.
pub struct JobMonitor {
    repository: Arc<dyn JobRepository>,
    config: MonitorConfig,
    shared: Arc<Shared>,
}

impl JobMonitor {
    /// Creates a monitor over `repository`
    pub fn new(repository: Arc<dyn JobRepository>, config: MonitorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            repository,
            config,
            shared: Arc::new(Shared::new()),
        })
    }

    /// Receiver for the latest published state
    pub fn subscribe(&self) -> watch::Receiver<JobState> {
        self.shared.state_tx.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> JobState {
        self.shared.state_tx.borrow().clone()
    }

    /// Whether a poll session is currently running
    pub fn has_active_session(&self) -> bool {
        self.shared.lock().session.is_some()
    }

    /// Submits `request` and settles the submission phase
    ///
    /// Returns once the job is either polling or already terminal (rejected,
    /// failed to start, or answered synchronously). Any previous session is
    /// cancelled before `Submitting` is published.
    pub async fn submit(&self, request: JobRequest) -> JobState {
        let generation = self.shared.supersede(JobState::Submitting);
        let kind = request.kind;
        info!(
            "Submitting {} job for {} (submission #{})",
            kind, request.ticker, generation
        );

        let answer = match self.repository.submit(&request).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Failed to submit {} job: {:#}", kind, e);
                self.shared
                    .transition(generation, JobState::Failed(JobError::Submission { kind }));
                return self.state();
            }
        };

        if let Some(reason) = answer.rejection() {
            warn!("Backend rejected {} job for {}: {}", kind, request.ticker, reason);
            self.shared
                .transition(generation, JobState::Failed(JobError::Rejected(reason)));
            return self.state();
        }

        if answer.is_error() {
            warn!("Backend answered the {} job for {} with a blank error", kind, request.ticker);
            self.shared
                .transition(generation, JobState::Failed(JobError::Submission { kind }));
            return self.state();
        }

        if let Some(job_id) = answer.task_id().map(str::to_owned) {
            self.start_polling(generation, job_id, request);
            return self.state();
        }

        let next = match (answer.result, kind) {
            (Some(result), _) => {
                info!("{} job for {} answered synchronously", kind, request.ticker);
                JobState::Succeeded(result)
            }
            (None, JobKind::Analysis(_)) => {
                info!("Cached {} result available for {}", kind, request.ticker);
                if !self.shared.transition(generation, JobState::FetchingResult) {
                    return self.state();
                }
                match handoff::fetch_output(self.repository.as_ref(), &request).await {
                    Ok(result) => JobState::Succeeded(result),
                    Err(error) => JobState::Failed(error),
                }
            }
            (None, JobKind::Backtest) => {
                warn!("Backend returned neither a task id nor a result for {}", request.ticker);
                JobState::Failed(JobError::Submission { kind })
            }
        };
        self.shared.transition(generation, next);
        self.state()
    }

    /// Submits `request` and waits until it reaches a terminal state
    ///
    /// Also returns if the monitor is cancelled meanwhile (the state is then
    /// `Idle`). If another submission supersedes this one, its outcome is
    /// returned instead.
    pub async fn run(&self, request: JobRequest) -> JobState {
        let mut rx = self.subscribe();
        let state = self.submit(request).await;
        if state.is_terminal() {
            return state;
        }

        match rx
            .wait_for(|state| state.is_terminal() || *state == JobState::Idle)
            .await
        {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    /// Cancels the current submission, if any, and returns to `Idle`
    pub fn cancel(&self) {
        self.shared.supersede(JobState::Idle);
    }

    fn start_polling(&self, generation: u64, job_id: String, request: JobRequest) {
        let timeout = self.config.timeout_for(&request.kind);
        let cadence = self.config.poll_interval;

        let started = self.shared.install(generation, || {
            let guard = TimeoutGuard::new(Instant::now(), timeout);
            let mut session = PollSession::new(generation, job_id.clone(), guard, cadence);
            let scheduler = PollScheduler::for_session(
                &session,
                Arc::clone(&self.repository),
                Arc::clone(&self.shared),
                request,
            );
            session.attach(tokio::spawn(scheduler.run()));
            session
        });

        if started {
            info!("Task {} started, giving up after {:?}", job_id, timeout);
        }
    }
}

impl Drop for JobMonitor {
    fn drop(&mut self) {
        if let Some(mut session) = self.shared.lock().session.take() {
            session.stop();
        }
    }
}
