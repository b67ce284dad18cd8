//! Task model definition.

use std::collections::BTreeSet;

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{TaskPriority, TaskStatus};

/// A unit of work under a planning, optionally nested under a parent task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanningTask {
    /// Backend-assigned identifier
    pub id: String,

    /// ID of the owning planning
    pub planning_id: String,

    pub title: String,

    pub description: String,

    pub status: TaskStatus,

    pub priority: TaskPriority,

    pub start_date: Date,

    pub due_date: Date,

    /// Set when the task reaches `completed`, cleared when it returns to
    /// `pending`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<Timestamp>,

    #[serde(default)]
    pub assigned_to: BTreeSet<String>,

    /// Completion percentage (0-100)
    pub progress: u8,

    pub created_at: Timestamp,

    pub updated_at: Timestamp,

    /// Parent task, `None` for root tasks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<String>,

    /// Display order among siblings sharing the same parent (0-indexed)
    pub order: u32,
}

impl PlanningTask {
    /// Whether this task is a direct child of `parent`.
    pub fn is_child_of(&self, parent: Option<&str>) -> bool {
        self.parent_task_id.as_deref() == parent
    }
}
