//! HTTP surface of the task management backend.
//!
//! Exposes authentication, project/task/time-log resources, and the audit
//! trail behind them. Authorization decisions live in `taskflow-core`; this
//! crate loads the relationship snapshots, asks the policy engine, and maps
//! the outcome onto HTTP.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
