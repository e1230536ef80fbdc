//! API Client
//!
//! Request orchestration against the admin REST API, organized by domain.
//! All business logic (validation, persistence, authorization) lives on
//! the server; these modules only shape requests and normalize responses.

mod client;

pub mod brokers;
pub mod challenges;
pub mod rebates;
pub mod resources;

pub use client::{configure, ApiConfig, Envelope};
