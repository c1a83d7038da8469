//! Domain core for the TaskFlow backend.
//!
//! This crate has no I/O dependencies. It holds the shared types, the error
//! taxonomy, the access policy engine, the closed task-status set, and the
//! audit change-set machinery. The `db` and `api` crates build on top of it.

pub mod audit;
pub mod error;
pub mod policy;
pub mod status;
pub mod types;
