//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - An [`Auditable`](taskflow_core::audit::Auditable) impl listing the
//!   entity's persisted columns as typed field descriptors

pub mod audit_log;
pub mod project;
pub mod task;
pub mod time_log;
pub mod user;
