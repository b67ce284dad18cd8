//! Display implementations for domain models.
//!
//! Kept apart from the model definitions; every implementation writes
//! markdown.

use std::collections::BTreeSet;
use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{
    Money, Planning, PlanningComment, PlanningDocument, PlanningStatus, PlanningTask,
    PlanningType, TaskPriority, TaskStatus,
};

impl fmt::Display for PlanningType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PlanningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor() < 0 { "-" } else { "" };
        let cents = self.minor().unsigned_abs();
        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

fn write_people(f: &mut fmt::Formatter<'_>, label: &str, people: &BTreeSet<String>) -> fmt::Result {
    if people.is_empty() {
        return Ok(());
    }
    let joined: Vec<&str> = people.iter().map(String::as_str).collect();
    writeln!(f, "- {label}: {}", joined.join(", "))
}

impl fmt::Display for Planning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.title)?;
        writeln!(f)?;

        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Type: {}", self.planning_type)?;
        writeln!(f, "- Status: {}", self.status)?;
        writeln!(f, "- Period: {} to {}", self.start_date, self.end_date)?;
        writeln!(f, "- Progress: {}%", self.progress)?;
        if let Some(budget) = &self.budget {
            writeln!(f, "- Budget: {budget}")?;
        }
        write_people(f, "Assigned to", &self.assigned_to)?;
        write_people(f, "Tags", &self.tags)?;
        writeln!(
            f,
            "- Created: {} by {}",
            LocalDateTime(&self.created_at),
            self.created_by
        )?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if !self.description.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.description)?;
        }

        Ok(())
    }
}

impl fmt::Display for PlanningTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {} ({}, {}%)",
            self.title,
            self.status.with_icon(),
            self.progress
        )?;
        writeln!(f)?;

        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Priority: {}", self.priority)?;
        writeln!(f, "- Schedule: {} to {}", self.start_date, self.due_date)?;
        if let Some(completed) = &self.completed_date {
            writeln!(f, "- Completed: {}", LocalDateTime(completed))?;
        }
        write_people(f, "Assigned to", &self.assigned_to)?;
        if let Some(parent) = &self.parent_task_id {
            writeln!(f, "- Parent: {parent}")?;
        }

        if !self.description.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.description)?;
        }
        writeln!(f)?;

        Ok(())
    }
}

impl fmt::Display for PlanningDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- **{}** ({}, {} bytes), uploaded {} by {}",
            self.name,
            self.file_type,
            self.file_size,
            LocalDateTime(&self.uploaded_at),
            self.uploaded_by
        )?;
        if let Some(task_id) = &self.task_id {
            write!(f, " on task {task_id}")?;
        }
        writeln!(f)?;
        writeln!(f, "  - ID: {}", self.id)?;
        writeln!(f, "  - URL: {}", self.file_url)?;
        if let Some(description) = &self.description {
            writeln!(f, "  - {description}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PlanningComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "**{}** at {}",
            self.created_by,
            LocalDateTime(&self.created_at)
        )?;
        if self.updated_at.is_some() {
            write!(f, " (edited)")?;
        }
        if let Some(task_id) = &self.task_id {
            write!(f, " on task {task_id}")?;
        }
        writeln!(f, " [{}]", self.id)?;
        writeln!(f)?;
        writeln!(f, "> {}", self.text.replace('\n', "\n> "))?;
        writeln!(f)
    }
}
