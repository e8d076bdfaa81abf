//! Scheduler layer
//!
//! This layer owns the polling lifecycle of a submitted job: the session
//! record with its deadline and cancel handle, and the periodic task that
//! checks status until a terminal outcome.

pub mod poller;
pub mod session;

pub(crate) use poller::PollScheduler;
pub use session::{PollSession, TimeoutGuard};
