//! Planning-level progress derived from task progress.

use crate::models::PlanningTask;

/// Overall completion of a planning: the mean of its tasks' progress,
/// rounded half up. A planning without tasks is at 0.
///
/// ```rust
/// use planning_core::progress::aggregate_progress;
///
/// assert_eq!(aggregate_progress(&[]), 0);
/// ```
pub fn aggregate_progress(tasks: &[PlanningTask]) -> u8 {
    if tasks.is_empty() {
        return 0;
    }

    let count = tasks.len() as u64;
    let sum: u64 = tasks.iter().map(|t| u64::from(t.progress)).sum();
    // floor(sum / count + 1/2) in integer arithmetic
    ((2 * sum + count) / (2 * count)).min(100) as u8
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use jiff::{civil::date, Timestamp};

    use super::*;
    use crate::models::{TaskPriority, TaskStatus};

    fn tasks(progress: &[u8]) -> Vec<PlanningTask> {
        progress
            .iter()
            .enumerate()
            .map(|(i, p)| PlanningTask {
                id: format!("t{i}"),
                planning_id: "p1".to_string(),
                title: String::new(),
                description: String::new(),
                status: TaskStatus::for_progress(*p),
                priority: TaskPriority::Medium,
                start_date: date(2024, 1, 1),
                due_date: date(2024, 1, 1),
                completed_date: None,
                assigned_to: BTreeSet::new(),
                progress: *p,
                created_at: Timestamp::UNIX_EPOCH,
                updated_at: Timestamp::UNIX_EPOCH,
                parent_task_id: None,
                order: i as u32,
            })
            .collect()
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(aggregate_progress(&[]), 0);
    }

    #[test]
    fn test_mean_of_tasks() {
        assert_eq!(aggregate_progress(&tasks(&[0, 100])), 50);
        assert_eq!(aggregate_progress(&tasks(&[100, 100, 100])), 100);
        assert_eq!(aggregate_progress(&tasks(&[10, 20, 40])), 23);
    }

    #[test]
    fn test_rounds_half_up() {
        // 25 + 50 = 75 / 2 = 37.5
        assert_eq!(aggregate_progress(&tasks(&[25, 50])), 38);
        // 1 + 2 = 1.5
        assert_eq!(aggregate_progress(&tasks(&[1, 2])), 2);
        // 1 + 1 + 2 = 1.33
        assert_eq!(aggregate_progress(&tasks(&[1, 1, 2])), 1);
    }

    #[test]
    fn test_matches_float_mean_rounding() {
        let samples: [&[u8]; 4] = [&[33, 33, 34], &[0, 0, 1], &[99, 100], &[7, 13, 50, 51]];
        for sample in samples {
            let mean = sample.iter().map(|p| f64::from(*p)).sum::<f64>() / sample.len() as f64;
            let expected = (mean + 0.5).floor() as u8;
            assert_eq!(aggregate_progress(&tasks(sample)), expected, "{sample:?}");
        }
    }
}
