//! Data Transfer Objects for backend communication
//!
//! This module contains the JSON shapes exchanged with the analysis backend.

pub mod job;
