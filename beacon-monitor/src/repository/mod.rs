//! Repository layer
//!
//! Repositories are stateless adapters over the analysis backend. They expose
//! exactly the three operations the monitor consumes (submit, poll status,
//! fetch result) without any business logic.
//!
//! The repository is trait-based so the monitor can be driven by a scripted
//! backend in tests.

mod jobs;

pub use jobs::HttpJobRepository;
pub use jobs::JobRepository;
