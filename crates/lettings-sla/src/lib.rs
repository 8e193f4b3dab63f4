//! Issue SLA engine for the lettings marketplace.
//!
//! Computes response deadlines for maintenance issues, derives overdue and
//! approaching-deadline state, and aggregates agency compliance figures.

pub mod config;
pub mod error;
pub mod sla;
pub mod telemetry;
