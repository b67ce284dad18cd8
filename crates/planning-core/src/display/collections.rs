//! Collection wrapper types for displaying groups of domain objects.

use std::{fmt, ops::Index};

use crate::models::{Planning, PlanningComment, PlanningDocument, PlanningTask, TaskTree};

/// Accessors shared by every collection wrapper.
macro_rules! collection_wrapper {
    ($wrapper:ident, $item:ty) => {
        impl $wrapper {
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn get(&self, index: usize) -> Option<&$item> {
                self.0.get(index)
            }

            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.0.iter()
            }
        }

        impl Index<usize> for $wrapper {
            type Output = $item;

            fn index(&self, index: usize) -> &Self::Output {
                &self.0[index]
            }
        }

        impl IntoIterator for $wrapper {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<Self::Item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $wrapper {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

/// Plannings as a one-line-per-planning list.
///
/// # Examples
///
/// ```rust
/// use planning_core::display::Plannings;
///
/// assert_eq!(Plannings(vec![]).to_string(), "No plannings found.\n");
/// ```
pub struct Plannings(pub Vec<Planning>);

collection_wrapper!(Plannings, Planning);

impl fmt::Display for Plannings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No plannings found.");
        }
        for planning in &self.0 {
            writeln!(
                f,
                "- **{}** ({}, {}, {}%) {} to {} [{}]",
                planning.title,
                planning.status,
                planning.planning_type,
                planning.progress,
                planning.start_date,
                planning.end_date,
                planning.id
            )?;
        }
        Ok(())
    }
}

/// Tasks of one planning, rendered as an indented tree.
///
/// Subtasks are nested under their parent in sibling order; tasks whose
/// parent is gone are listed at the top level.
pub struct Tasks(pub Vec<PlanningTask>);

collection_wrapper!(Tasks, PlanningTask);

impl Tasks {
    pub fn tree(&self) -> TaskTree<'_> {
        TaskTree::build(&self.0)
    }
}

impl fmt::Display for Tasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No tasks found.");
        }
        for (depth, task) in self.tree().depth_first() {
            writeln!(
                f,
                "{}- {} **{}** {}% (due {}) [{}]",
                "  ".repeat(depth),
                task.status.with_icon(),
                task.title,
                task.progress,
                task.due_date,
                task.id
            )?;
        }
        Ok(())
    }
}

pub struct Documents(pub Vec<PlanningDocument>);

collection_wrapper!(Documents, PlanningDocument);

impl fmt::Display for Documents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No documents found.");
        }
        for document in &self.0 {
            write!(f, "{document}")?;
        }
        Ok(())
    }
}

pub struct Comments(pub Vec<PlanningComment>);

collection_wrapper!(Comments, PlanningComment);

impl fmt::Display for Comments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No comments yet.");
        }
        for comment in &self.0 {
            write!(f, "{comment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use jiff::{civil::date, Timestamp};

    use super::*;
    use crate::models::{TaskPriority, TaskStatus};

    fn task(id: &str, parent: Option<&str>, order: u32, status: TaskStatus) -> PlanningTask {
        PlanningTask {
            id: id.to_string(),
            planning_id: "p1".to_string(),
            title: format!("Task {id}"),
            description: String::new(),
            status,
            priority: TaskPriority::Medium,
            start_date: date(2024, 1, 1),
            due_date: date(2024, 1, 15),
            completed_date: None,
            assigned_to: BTreeSet::new(),
            progress: status.nominal_progress().unwrap_or(0),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            parent_task_id: parent.map(String::from),
            order,
        }
    }

    #[test]
    fn test_empty_collections() {
        assert_eq!(Tasks(vec![]).to_string(), "No tasks found.\n");
        assert_eq!(Documents(vec![]).to_string(), "No documents found.\n");
        assert_eq!(Comments(vec![]).to_string(), "No comments yet.\n");
    }

    #[test]
    fn test_tasks_render_as_tree() {
        let tasks = Tasks(vec![
            task("b", None, 1, TaskStatus::Pending),
            task("a1", Some("a"), 0, TaskStatus::Completed),
            task("a", None, 0, TaskStatus::InProgress),
        ]);

        let lines: Vec<String> = tasks.to_string().lines().map(String::from).collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("- ➤ In Progress **Task a** 50%"));
        assert!(lines[1].starts_with("  - ✓ Completed **Task a1** 100%"));
        assert!(lines[2].starts_with("- ○ Pending **Task b** 0%"));
    }

    #[test]
    fn test_wrapper_accessors() {
        let tasks = Tasks(vec![task("a", None, 0, TaskStatus::Pending)]);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "a");
        assert!(tasks.get(1).is_none());
    }
}
