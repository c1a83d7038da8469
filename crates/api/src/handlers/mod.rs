//! Request handlers, grouped by resource.

pub mod auth;
pub mod projects;
pub mod tasks;
pub mod time_logs;
pub mod users;
