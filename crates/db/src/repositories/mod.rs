//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Single-query reads accept any `PgExecutor` so they work against the pool
//! and inside a unit-of-work transaction alike; mutations and multi-query
//! loads take `&mut PgConnection` so they always run inside one.

pub mod audit_log_repo;
pub mod project_repo;
pub mod task_repo;
pub mod time_log_repo;
pub mod user_repo;

pub use audit_log_repo::AuditLogRepo;
pub use project_repo::ProjectRepo;
pub use task_repo::TaskRepo;
pub use time_log_repo::TimeLogRepo;
pub use user_repo::UserRepo;
