//! Closed task-status enumeration.
//!
//! Any transition between members of the set is permitted given
//! authorization; there is no directed transition graph and no terminal
//! state. Unrecognized status strings must be rejected before any
//! persistence happens.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    ToDo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Every member of the closed set, in display order.
    pub const ALL: [TaskStatus; 3] = [Self::ToDo, Self::InProgress, Self::Done];

    /// String representation for display and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToDo => "ToDo",
            Self::InProgress => "InProgress",
            Self::Done => "Done",
        }
    }

    /// Parse a status string (case-insensitive, matching the original API's
    /// lenient parsing). Unknown strings are a validation error.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.as_str().eq_ignore_ascii_case(input))
            .ok_or_else(|| CoreError::Validation("Invalid task status.".to_string()))
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
