//! DP-2001 personnel action workflow core.
//!
//! A pre-validation gate must be approved before the dependent DP-2001
//! action request can be filed and moved through its lifecycle. Every
//! status transition is committed together with exactly one audit entry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
