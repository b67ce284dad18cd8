//! The task status/progress relation.
//!
//! A task's status and progress describe the same fact twice. Setting one
//! derives the other through [`TaskStatus::for_progress`] and
//! [`TaskStatus::nominal_progress`]; both directions build a
//! [`TaskTransition`] so the two derivations cannot drift apart.
//!
//! | new status  | progress                               | completed date |
//! |-------------|----------------------------------------|----------------|
//! | completed   | 100                                    | set            |
//! | in_progress | 50 when it was 0 or 100, else kept     | kept           |
//! | pending     | 0                                      | cleared        |
//! | cancelled   | kept                                   | kept           |

use jiff::Timestamp;

use super::{PlanningTask, TaskStatus};
use crate::error::{PlanningError, Result};

/// Upper bound of a progress percentage.
pub const MAX_PROGRESS: u8 = 100;

impl TaskStatus {
    /// Status implied by a progress value.
    ///
    /// ```rust
    /// use planning_core::models::TaskStatus;
    ///
    /// assert_eq!(TaskStatus::for_progress(0), TaskStatus::Pending);
    /// assert_eq!(TaskStatus::for_progress(42), TaskStatus::InProgress);
    /// assert_eq!(TaskStatus::for_progress(100), TaskStatus::Completed);
    /// ```
    pub fn for_progress(progress: u8) -> TaskStatus {
        match progress {
            0 => TaskStatus::Pending,
            p if p >= MAX_PROGRESS => TaskStatus::Completed,
            _ => TaskStatus::InProgress,
        }
    }

    /// Progress a task is moved to when it enters this status from a
    /// progress value that implies another one. `None` for `cancelled`,
    /// which never touches progress.
    pub fn nominal_progress(&self) -> Option<u8> {
        match self {
            TaskStatus::Pending => Some(0),
            TaskStatus::InProgress => Some(50),
            TaskStatus::Completed => Some(MAX_PROGRESS),
            TaskStatus::Cancelled => None,
        }
    }
}

/// What happens to a task's completion timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionChange {
    Keep,
    Set(Timestamp),
    Clear,
}

impl CompletionChange {
    /// Applies the change to a stored completion date.
    pub fn resolve(self, current: Option<Timestamp>) -> Option<Timestamp> {
        match self {
            CompletionChange::Keep => current,
            CompletionChange::Set(at) => Some(at),
            CompletionChange::Clear => None,
        }
    }
}

/// The resulting status, progress and completion effect of a status or
/// progress change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTransition {
    pub status: TaskStatus,
    pub progress: u8,
    pub completed_date: CompletionChange,
}

impl TaskTransition {
    /// Transition for an explicit status change.
    pub fn to_status(task: &PlanningTask, status: TaskStatus, now: Timestamp) -> Self {
        let progress = match status.nominal_progress() {
            Some(_) if TaskStatus::for_progress(task.progress) == status => task.progress,
            Some(nominal) => nominal,
            None => task.progress,
        };

        Self {
            status,
            progress,
            completed_date: completion_change(task, status, now),
        }
    }

    /// Transition for an explicit progress change.
    ///
    /// # Errors
    ///
    /// Returns `PlanningError::InvalidInput` when `progress` exceeds 100.
    pub fn to_progress(task: &PlanningTask, progress: u8, now: Timestamp) -> Result<Self> {
        if progress > MAX_PROGRESS {
            return Err(PlanningError::invalid_input("progress")
                .with_reason(format!("Progress must be between 0 and 100, got {progress}")));
        }

        let implied = TaskStatus::for_progress(progress);
        if implied == task.status {
            return Ok(Self {
                status: task.status,
                progress,
                completed_date: CompletionChange::Keep,
            });
        }

        Ok(Self {
            status: implied,
            progress,
            completed_date: completion_change(task, implied, now),
        })
    }

    /// Applies the transition to an in-memory task.
    pub fn apply(&self, task: &mut PlanningTask, now: Timestamp) {
        task.status = self.status;
        task.progress = self.progress;
        task.completed_date = self.completed_date.resolve(task.completed_date);
        task.updated_at = now;
    }
}

fn completion_change(task: &PlanningTask, status: TaskStatus, now: Timestamp) -> CompletionChange {
    match status {
        // Re-completing keeps the original completion instant.
        TaskStatus::Completed
            if task.status == TaskStatus::Completed && task.completed_date.is_some() =>
        {
            CompletionChange::Keep
        }
        TaskStatus::Completed => CompletionChange::Set(now),
        TaskStatus::Pending => CompletionChange::Clear,
        TaskStatus::InProgress | TaskStatus::Cancelled => CompletionChange::Keep,
    }
}
