//! Core domain types
//!
//! This module contains the domain structures shared between the HTTP client
//! (which puts them on the wire) and the job monitor (which reasons about them).

pub mod job;
pub mod result;
pub mod task;
