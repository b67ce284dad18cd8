//! Enumerations for planning types, statuses and task priorities.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Time box a planning covers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanningType {
    #[default]
    Monthly,
    Quarterly,
    Biannual,
    Annual,
}

impl FromStr for PlanningType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(PlanningType::Monthly),
            "quarterly" => Ok(PlanningType::Quarterly),
            "biannual" => Ok(PlanningType::Biannual),
            "annual" => Ok(PlanningType::Annual),
            _ => Err(format!("Invalid planning type: {s}")),
        }
    }
}

impl PlanningType {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanningType::Monthly => "monthly",
            PlanningType::Quarterly => "quarterly",
            PlanningType::Biannual => "biannual",
            PlanningType::Annual => "annual",
        }
    }
}

/// Lifecycle status of a planning.
///
/// Any status may move to any other; there is no transition table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanningStatus {
    #[default]
    Draft,
    InProgress,
    Completed,
    Cancelled,
}

impl FromStr for PlanningStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(PlanningStatus::Draft),
            "in_progress" | "inprogress" => Ok(PlanningStatus::InProgress),
            "completed" => Ok(PlanningStatus::Completed),
            "cancelled" => Ok(PlanningStatus::Cancelled),
            _ => Err(format!("Invalid planning status: {s}")),
        }
    }
}

impl PlanningStatus {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanningStatus::Draft => "draft",
            PlanningStatus::InProgress => "in_progress",
            PlanningStatus::Completed => "completed",
            PlanningStatus::Cancelled => "cancelled",
        }
    }
}

/// Status of a single task.
///
/// Kept consistent with the task's progress, see
/// [`crate::models::transition`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" | "inprogress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "cancelled" => Ok(TaskStatus::Cancelled),
            _ => Err(format!("Invalid task status: {s}")),
        }
    }
}

impl TaskStatus {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planning_core::models::TaskStatus;
    ///
    /// assert_eq!(TaskStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(TaskStatus::InProgress.with_icon(), "➤ In Progress");
    /// assert_eq!(TaskStatus::Pending.with_icon(), "○ Pending");
    /// assert_eq!(TaskStatus::Cancelled.with_icon(), "✗ Cancelled");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            TaskStatus::Completed => "✓ Completed",
            TaskStatus::InProgress => "➤ In Progress",
            TaskStatus::Pending => "○ Pending",
            TaskStatus::Cancelled => "✗ Cancelled",
        }
    }
}

/// Task urgency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            "urgent" => Ok(TaskPriority::Urgent),
            _ => Err(format!("Invalid task priority: {s}")),
        }
    }
}

impl TaskPriority {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}
