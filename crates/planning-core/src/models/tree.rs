//! On-demand parent/child index over a flat task list.

use std::collections::HashMap;

use super::PlanningTask;

/// Borrowed view of a planning's tasks as a tree.
///
/// The flat list with `parent_task_id` remains the source of truth; the index
/// is rebuilt whenever a tree is needed. Tasks whose parent is not in the
/// list (orphans left behind by single-level deletes) are treated as roots.
pub struct TaskTree<'a> {
    roots: Vec<&'a PlanningTask>,
    children: HashMap<&'a str, Vec<&'a PlanningTask>>,
}

impl<'a> TaskTree<'a> {
    /// Builds the index. Siblings are sorted by `order`.
    pub fn build(tasks: &'a [PlanningTask]) -> Self {
        let known: HashMap<&str, &PlanningTask> =
            tasks.iter().map(|t| (t.id.as_str(), t)).collect();

        let mut roots = Vec::new();
        let mut children: HashMap<&str, Vec<&PlanningTask>> = HashMap::new();
        for task in tasks {
            match task.parent_task_id.as_deref() {
                Some(parent) if known.contains_key(parent) => {
                    children.entry(parent).or_default().push(task);
                }
                _ => roots.push(task),
            }
        }

        roots.sort_by_key(|t| t.order);
        for siblings in children.values_mut() {
            siblings.sort_by_key(|t| t.order);
        }

        Self { roots, children }
    }

    /// Top-level tasks in display order.
    pub fn roots(&self) -> &[&'a PlanningTask] {
        &self.roots
    }

    /// Direct children of `parent_id` in display order.
    pub fn children(&self, parent_id: &str) -> &[&'a PlanningTask] {
        self.children
            .get(parent_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Pre-order walk yielding each task with its depth (roots are 0).
    pub fn depth_first(&self) -> Vec<(usize, &'a PlanningTask)> {
        let mut out = Vec::new();
        let mut stack: Vec<(usize, &PlanningTask)> =
            self.roots.iter().rev().map(|t| (0, *t)).collect();

        while let Some((depth, task)) = stack.pop() {
            out.push((depth, task));
            for child in self.children(&task.id).iter().rev() {
                stack.push((depth + 1, *child));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use jiff::{civil::date, Timestamp};

    use super::*;
    use crate::models::{TaskPriority, TaskStatus};

    fn task(id: &str, parent: Option<&str>, order: u32) -> PlanningTask {
        PlanningTask {
            id: id.to_string(),
            planning_id: "p1".to_string(),
            title: format!("Task {id}"),
            description: String::new(),
            status: TaskStatus::Pending,
            priority: TaskPriority::Low,
            start_date: date(2024, 1, 1),
            due_date: date(2024, 1, 2),
            completed_date: None,
            assigned_to: BTreeSet::new(),
            progress: 0,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            parent_task_id: parent.map(String::from),
            order,
        }
    }

    #[test]
    fn test_depth_first_follows_sibling_order() {
        let tasks = vec![
            task("b", None, 1),
            task("a", None, 0),
            task("a2", Some("a"), 1),
            task("a1", Some("a"), 0),
            task("a1x", Some("a1"), 0),
        ];
        let tree = TaskTree::build(&tasks);

        let walk: Vec<(usize, &str)> = tree
            .depth_first()
            .into_iter()
            .map(|(d, t)| (d, t.id.as_str()))
            .collect();
        assert_eq!(
            walk,
            vec![(0, "a"), (1, "a1"), (2, "a1x"), (1, "a2"), (0, "b")]
        );
        assert_eq!(tree.children("a").len(), 2);
        assert!(tree.children("b").is_empty());
    }

    #[test]
    fn test_orphans_are_roots() {
        let tasks = vec![task("x", Some("gone"), 0), task("r", None, 0)];
        let tree = TaskTree::build(&tasks);
        assert_eq!(tree.roots().len(), 2);
    }
}
