//! Access policy engine.
//!
//! Pure decision functions: the caller loads the relationship snapshot for
//! the target resource (creator, admin memberships, assignee) and passes it
//! in together with the acting user's id. Nothing here touches the database,
//! so every rule is testable in isolation.
//!
//! Denials carry a classification: `NotFound` when the actor must not learn
//! that the resource exists, `Forbidden` when the resource is already known
//! to the actor but the action is disallowed. The classification for each
//! rule -- including for resources that fail to load at all -- is owned by
//! this module via the exported [`Denial`] constants, so handlers never pick
//! a status code for an authorization outcome themselves.

use crate::types::DbId;

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    /// Convert an evaluation into a `Result`, for use with `?` at call sites.
    pub fn check(self) -> Result<(), Denial> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(denial) => Err(denial),
        }
    }
}

/// How a denial should be reported across the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialKind {
    /// The action is disallowed on a resource the actor already knows exists.
    Forbidden,
    /// The actor must not learn whether the resource exists.
    NotFound,
}

/// A denied decision: classification plus a human-readable reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denial {
    pub kind: DenialKind,
    pub reason: &'static str,
}

impl Denial {
    pub const fn forbidden(reason: &'static str) -> Self {
        Self {
            kind: DenialKind::Forbidden,
            reason,
        }
    }

    pub const fn not_found(reason: &'static str) -> Self {
        Self {
            kind: DenialKind::NotFound,
            reason,
        }
    }
}

// ---------------------------------------------------------------------------
// Relationship snapshots
// ---------------------------------------------------------------------------

/// The slice of a project's state that policy decisions depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRelations {
    /// The project creator. Immutable after creation; holds superset rights.
    pub creator_id: DbId,
    /// Users holding an Admin membership on the project.
    pub admin_ids: Vec<DbId>,
}

impl ProjectRelations {
    pub fn is_admin(&self, user_id: DbId) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

/// The slice of a task's state that policy decisions depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRelations {
    pub project: ProjectRelations,
    /// Current assignee, if any.
    pub assignee_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectAction {
    Read,
    Update,
    Delete,
    /// Adding or removing project admins.
    ManageAdmins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Read,
    /// Listing every task of a project.
    ListForProject,
    Create,
    Update,
    Delete,
    Assign,
    Unassign,
    UpdateStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLogAction {
    Create,
    Read,
}

// ---------------------------------------------------------------------------
// Denial constants
// ---------------------------------------------------------------------------

/// Project lookup that hides existence from non-members.
pub const PROJECT_NOT_VISIBLE: Denial =
    Denial::not_found("Project not found or you do not have access.");
pub const PROJECT_UPDATE_DENIED: Denial =
    Denial::forbidden("Only the project creator can update this project.");
pub const PROJECT_DELETE_DENIED: Denial =
    Denial::forbidden("Only the creator can delete this project.");
pub const PROJECT_MANAGE_ADMINS_DENIED: Denial =
    Denial::forbidden("Only the project creator can manage admins.");

/// Task lookup by id; the id itself does not leak project membership.
pub const TASK_NOT_FOUND: Denial = Denial::not_found("Task not found.");
pub const TASK_READ_DENIED: Denial = Denial::forbidden("Not authorized to view this task.");
pub const TASK_LIST_DENIED: Denial = Denial::forbidden("Only admins can view project tasks.");
pub const TASK_CREATE_DENIED: Denial = Denial::forbidden("Only project admins can create tasks.");
pub const TASK_UPDATE_DENIED: Denial =
    Denial::forbidden("You don't have permission to update this task.");
pub const TASK_DELETE_DENIED: Denial = Denial::forbidden("Only project admins can delete tasks.");
pub const TASK_ASSIGN_DENIED: Denial = Denial::forbidden("Only project admins can assign tasks.");
pub const TASK_UNASSIGN_DENIED: Denial =
    Denial::forbidden("Only project creator or admins can unassign this task.");
pub const TASK_STATUS_DENIED: Denial = Denial::forbidden("Not allowed to update this task.");

pub const TIME_LOG_CREATE_DENIED: Denial =
    Denial::forbidden("Only the assigned user can log time.");
pub const TIME_LOG_READ_DENIED: Denial =
    Denial::forbidden("Not authorized to view logs for this task.");

// ---------------------------------------------------------------------------
// Decision functions
// ---------------------------------------------------------------------------

fn allow_if(condition: bool, denial: Denial) -> Decision {
    if condition {
        Decision::Allow
    } else {
        Decision::Deny(denial)
    }
}

/// Decide whether `actor` may perform `action` on a project.
pub fn decide_project(actor: DbId, project: &ProjectRelations, action: ProjectAction) -> Decision {
    let is_creator = project.creator_id == actor;
    match action {
        // Reads are open to the creator and any admin; everyone else is told
        // the project does not exist.
        ProjectAction::Read => allow_if(is_creator || project.is_admin(actor), PROJECT_NOT_VISIBLE),
        // Mutating the project itself is reserved for the creator, even
        // against users holding an Admin membership.
        ProjectAction::Update => allow_if(is_creator, PROJECT_UPDATE_DENIED),
        ProjectAction::Delete => allow_if(is_creator, PROJECT_DELETE_DENIED),
        ProjectAction::ManageAdmins => allow_if(is_creator, PROJECT_MANAGE_ADMINS_DENIED),
    }
}

/// Decide whether `actor` may perform `action` on a task.
///
/// `ListForProject` and `Create` are evaluated before a task exists; callers
/// build the [`TaskRelations`] from the target project with no assignee.
pub fn decide_task(actor: DbId, task: &TaskRelations, action: TaskAction) -> Decision {
    let is_admin = task.project.is_admin(actor);
    let is_creator = task.project.creator_id == actor;
    let is_assignee = task.assignee_id == Some(actor);
    match action {
        TaskAction::Read => allow_if(is_admin || is_assignee, TASK_READ_DENIED),
        TaskAction::ListForProject => allow_if(is_admin, TASK_LIST_DENIED),
        TaskAction::Create => allow_if(is_admin, TASK_CREATE_DENIED),
        TaskAction::Update => allow_if(is_admin, TASK_UPDATE_DENIED),
        TaskAction::Delete => allow_if(is_admin, TASK_DELETE_DENIED),
        TaskAction::Assign => allow_if(is_admin, TASK_ASSIGN_DENIED),
        TaskAction::Unassign => allow_if(is_creator || is_admin, TASK_UNASSIGN_DENIED),
        TaskAction::UpdateStatus => allow_if(is_admin || is_assignee, TASK_STATUS_DENIED),
    }
}

/// Decide whether `actor` may perform `action` on a task's time logs.
///
/// Read access for a non-admin assignee may additionally be narrowed to the
/// caller's own rows by the handler's `only_mine` filter; that filter is a
/// query refinement, not an authorization decision.
pub fn decide_time_log(actor: DbId, task: &TaskRelations, action: TimeLogAction) -> Decision {
    let is_admin = task.project.is_admin(actor);
    let is_assignee = task.assignee_id == Some(actor);
    match action {
        TimeLogAction::Create => allow_if(is_assignee, TIME_LOG_CREATE_DENIED),
        TimeLogAction::Read => allow_if(is_admin || is_assignee, TIME_LOG_READ_DENIED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATOR: DbId = 1;
    const ADMIN: DbId = 2;
    const ASSIGNEE: DbId = 3;
    const OUTSIDER: DbId = 4;

    fn project() -> ProjectRelations {
        ProjectRelations {
            creator_id: CREATOR,
            admin_ids: vec![CREATOR, ADMIN],
        }
    }

    fn task_assigned_to(user: DbId) -> TaskRelations {
        TaskRelations {
            project: project(),
            assignee_id: Some(user),
        }
    }

    // -----------------------------------------------------------------------
    // Project rules
    // -----------------------------------------------------------------------

    #[test]
    fn project_read_allows_creator_and_admin() {
        let p = project();
        assert_eq!(
            decide_project(CREATOR, &p, ProjectAction::Read),
            Decision::Allow
        );
        assert_eq!(
            decide_project(ADMIN, &p, ProjectAction::Read),
            Decision::Allow
        );
    }

    #[test]
    fn project_read_denies_outsider_as_not_found() {
        let p = project();
        let Decision::Deny(denial) = decide_project(OUTSIDER, &p, ProjectAction::Read) else {
            panic!("outsider must be denied");
        };
        assert_eq!(denial.kind, DenialKind::NotFound);
    }

    #[test]
    fn project_update_and_delete_require_creator_even_against_admins() {
        let p = project();
        for action in [ProjectAction::Update, ProjectAction::Delete] {
            assert_eq!(decide_project(CREATOR, &p, action), Decision::Allow);
            let Decision::Deny(denial) = decide_project(ADMIN, &p, action) else {
                panic!("admin must not mutate the project itself");
            };
            assert_eq!(denial.kind, DenialKind::Forbidden);
        }
    }

    #[test]
    fn manage_admins_requires_creator() {
        let p = project();
        assert_eq!(
            decide_project(CREATOR, &p, ProjectAction::ManageAdmins),
            Decision::Allow
        );
        assert_eq!(
            decide_project(ADMIN, &p, ProjectAction::ManageAdmins),
            Decision::Deny(PROJECT_MANAGE_ADMINS_DENIED)
        );
    }

    // -----------------------------------------------------------------------
    // Task rules
    // -----------------------------------------------------------------------

    #[test]
    fn task_read_allows_admin_or_assignee_only() {
        let t = task_assigned_to(ASSIGNEE);
        assert_eq!(decide_task(ADMIN, &t, TaskAction::Read), Decision::Allow);
        assert_eq!(decide_task(ASSIGNEE, &t, TaskAction::Read), Decision::Allow);
        assert_eq!(
            decide_task(OUTSIDER, &t, TaskAction::Read),
            Decision::Deny(TASK_READ_DENIED)
        );
    }

    #[test]
    fn task_mutations_require_admin() {
        let t = task_assigned_to(ASSIGNEE);
        for action in [
            TaskAction::Create,
            TaskAction::Update,
            TaskAction::Delete,
            TaskAction::Assign,
            TaskAction::ListForProject,
        ] {
            assert_eq!(decide_task(ADMIN, &t, action), Decision::Allow);
            // The assignee alone does not get task-management rights.
            let Decision::Deny(denial) = decide_task(ASSIGNEE, &t, action) else {
                panic!("assignee must not manage tasks via {action:?}");
            };
            assert_eq!(denial.kind, DenialKind::Forbidden);
        }
    }

    #[test]
    fn unassign_allows_creator_or_admin() {
        let t = task_assigned_to(ASSIGNEE);
        assert_eq!(
            decide_task(CREATOR, &t, TaskAction::Unassign),
            Decision::Allow
        );
        assert_eq!(decide_task(ADMIN, &t, TaskAction::Unassign), Decision::Allow);
        assert_eq!(
            decide_task(ASSIGNEE, &t, TaskAction::Unassign),
            Decision::Deny(TASK_UNASSIGN_DENIED)
        );
    }

    #[test]
    fn status_update_allows_admin_or_assignee() {
        let t = task_assigned_to(ASSIGNEE);
        assert_eq!(
            decide_task(ADMIN, &t, TaskAction::UpdateStatus),
            Decision::Allow
        );
        assert_eq!(
            decide_task(ASSIGNEE, &t, TaskAction::UpdateStatus),
            Decision::Allow
        );
        assert_eq!(
            decide_task(OUTSIDER, &t, TaskAction::UpdateStatus),
            Decision::Deny(TASK_STATUS_DENIED)
        );
    }

    #[test]
    fn unassigned_task_gives_assignee_no_rights() {
        let t = TaskRelations {
            project: project(),
            assignee_id: None,
        };
        assert_eq!(
            decide_task(ASSIGNEE, &t, TaskAction::Read),
            Decision::Deny(TASK_READ_DENIED)
        );
        assert_eq!(
            decide_time_log(ASSIGNEE, &t, TimeLogAction::Create),
            Decision::Deny(TIME_LOG_CREATE_DENIED)
        );
    }

    // -----------------------------------------------------------------------
    // Time log rules
    // -----------------------------------------------------------------------

    #[test]
    fn time_log_create_is_assignee_only() {
        let t = task_assigned_to(ASSIGNEE);
        assert_eq!(
            decide_time_log(ASSIGNEE, &t, TimeLogAction::Create),
            Decision::Allow
        );
        // Even a project admin may not log time on someone else's task.
        assert_eq!(
            decide_time_log(ADMIN, &t, TimeLogAction::Create),
            Decision::Deny(TIME_LOG_CREATE_DENIED)
        );
    }

    #[test]
    fn time_log_read_allows_admin_or_assignee() {
        let t = task_assigned_to(ASSIGNEE);
        assert_eq!(
            decide_time_log(ADMIN, &t, TimeLogAction::Read),
            Decision::Allow
        );
        assert_eq!(
            decide_time_log(ASSIGNEE, &t, TimeLogAction::Read),
            Decision::Allow
        );
        assert_eq!(
            decide_time_log(OUTSIDER, &t, TimeLogAction::Read),
            Decision::Deny(TIME_LOG_READ_DENIED)
        );
    }

    #[test]
    fn check_converts_deny_into_err() {
        let t = task_assigned_to(ASSIGNEE);
        assert!(decide_task(ADMIN, &t, TaskAction::Read).check().is_ok());
        let denial = decide_task(OUTSIDER, &t, TaskAction::Read)
            .check()
            .unwrap_err();
        assert_eq!(denial, TASK_READ_DENIED);
    }
}
