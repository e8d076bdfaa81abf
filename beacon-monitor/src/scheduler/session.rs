//! Poll session bookkeeping

use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Bounds the total wait of one poll session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutGuard {
    started_at: Instant,
    deadline: Instant,
}

impl TimeoutGuard {
    pub fn new(started_at: Instant, timeout: Duration) -> Self {
        Self {
            started_at,
            deadline: started_at + timeout,
        }
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// True once `now` is strictly past the deadline
    pub fn expired(&self, now: Instant) -> bool {
        now > self.deadline
    }
}

/// One submission's polling lifecycle
///
/// The session owns the periodic task. Stopping it cancels the task's token
/// (so an in-flight request resolves into nothing) and aborts the task. A
/// session is stopped when it is dropped, so every exit path releases it.
#[derive(Debug)]
pub struct PollSession {
    generation: u64,
    job_id: String,
    guard: TimeoutGuard,
    cadence: Duration,
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollSession {
    pub(crate) fn new(generation: u64, job_id: String, guard: TimeoutGuard, cadence: Duration) -> Self {
        Self {
            generation,
            job_id,
            guard,
            cadence,
            token: CancellationToken::new(),
            task: None,
        }
    }

    /// Hands the periodic task to the session
    pub(crate) fn attach(&mut self, task: JoinHandle<()>) {
        self.task = Some(task);
    }

    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Submission this session belongs to
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn job_id(&self) -> &str {
        &self.job_id
    }

    pub(crate) fn guard(&self) -> TimeoutGuard {
        self.guard
    }

    pub(crate) fn cadence(&self) -> Duration {
        self.cadence
    }

    /// Stops the periodic task; safe to call more than once
    pub fn stop(&mut self) {
        if !self.token.is_cancelled() {
            debug!("Stopping poll session for task {}", self.job_id);
            self.token.cancel();
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for PollSession {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_guard_expires_strictly_after_deadline() {
        let start = Instant::now();
        let guard = TimeoutGuard::new(start, Duration::from_secs(180));

        assert_eq!(guard.deadline(), start + Duration::from_secs(180));
        assert!(!guard.expired(start + Duration::from_secs(179)));
        assert!(!guard.expired(start + Duration::from_secs(180)));
        assert!(guard.expired(start + Duration::from_millis(180_001)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent_and_aborts_task() {
        let guard = TimeoutGuard::new(Instant::now(), Duration::from_secs(60));
        let mut session = PollSession::new(1, "t1".to_string(), guard, Duration::from_secs(5));
        let token = session.token();
        session.attach(tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }));

        session.stop();
        session.stop();

        assert!(token.is_cancelled());
        assert!(session.task.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_session() {
        let guard = TimeoutGuard::new(Instant::now(), Duration::from_secs(60));
        let session = PollSession::new(1, "t1".to_string(), guard, Duration::from_secs(5));
        let token = session.token();

        drop(session);

        assert!(token.is_cancelled());
    }
}
