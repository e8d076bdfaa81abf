//! Beacon Core
//!
//! Core types shared by the Beacon job client crates.
//!
//! This crate contains:
//! - Domain types: job kinds, submission requests, backend task states, result payloads
//! - DTOs: wire shapes of the analysis backend's submit and status endpoints

pub mod domain;
pub mod dto;
