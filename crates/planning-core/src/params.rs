//! Parameter structures for store operations.
//!
//! These are the inputs views hand to [`crate::PlanningStore`]. They carry no
//! framework-specific derives beyond serde, so any interface (the CLI, a web
//! handler, tests) can build them directly or wrap them with its own argument
//! types and convert via `From`.
//!
//! Derived fields are deliberately absent: a planning's progress and its
//! initial status, a task's initial status and progress, identifiers and
//! timestamps are all decided by the store.

use std::collections::BTreeSet;

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    backend::Record,
    error::{PlanningError, Result},
    models::{
        record::{budget_value, date_value, fields, opt_string_value, set_value, timestamp_value},
        Money, PlanningStatus, PlanningType, TaskPriority,
    },
};

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PlanningError::invalid_input(field).with_reason("must not be empty"));
    }
    Ok(())
}

fn require_range(start_field: &str, start: Date, end_field: &str, end: Date) -> Result<()> {
    if end < start {
        return Err(PlanningError::invalid_input(end_field)
            .with_reason(format!("{end} is before {start_field} {start}")));
    }
    Ok(())
}

fn require_budget(budget: f64) -> Result<()> {
    if !budget.is_finite() || budget < 0.0 {
        return Err(PlanningError::invalid_input("budget")
            .with_reason(format!("must be a non-negative amount, got {budget}")));
    }
    if budget > Money::MAX_MAJOR {
        return Err(PlanningError::invalid_input("budget")
            .with_reason(format!("must not exceed {}", Money::MAX_MAJOR)));
    }
    Ok(())
}

/// Parameters for creating a planning.
///
/// The planning always starts as `draft` with progress 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePlanning {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub planning_type: PlanningType,
    pub start_date: Date,
    pub end_date: Date,
    #[serde(default)]
    pub assigned_to: BTreeSet<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Budget in major units
    #[serde(default)]
    pub budget: Option<f64>,
}

impl CreatePlanning {
    /// Checks title, date range and budget.
    pub fn validate(&self) -> Result<()> {
        require_text("title", &self.title)?;
        require_range("start_date", self.start_date, "end_date", self.end_date)?;
        if let Some(budget) = self.budget {
            require_budget(budget)?;
        }
        Ok(())
    }
}

/// Partial update of a planning. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePlanning {
    pub title: Option<String>,
    pub description: Option<String>,
    pub planning_type: Option<PlanningType>,
    pub status: Option<PlanningStatus>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub assigned_to: Option<BTreeSet<String>>,
    pub tags: Option<BTreeSet<String>>,
    /// `Some(None)` removes the budget; amounts are in major units
    pub budget: Option<Option<f64>>,
}

impl UpdatePlanning {
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            require_range("start_date", start, "end_date", end)?;
        }
        if let Some(Some(budget)) = self.budget {
            require_budget(budget)?;
        }
        Ok(())
    }

    /// Record holding only the present fields plus a fresh `updatedAt`.
    pub fn to_patch(&self, now: Timestamp) -> Record {
        let mut patch = Record::new();
        if let Some(title) = &self.title {
            patch.insert(fields::TITLE.into(), Value::from(title.as_str()));
        }
        if let Some(description) = &self.description {
            patch.insert(fields::DESCRIPTION.into(), Value::from(description.as_str()));
        }
        if let Some(planning_type) = self.planning_type {
            patch.insert(fields::TYPE.into(), Value::from(planning_type.as_str()));
        }
        if let Some(status) = self.status {
            patch.insert(fields::STATUS.into(), Value::from(status.as_str()));
        }
        if let Some(start) = &self.start_date {
            patch.insert(fields::START_DATE.into(), date_value(start));
        }
        if let Some(end) = &self.end_date {
            patch.insert(fields::END_DATE.into(), date_value(end));
        }
        if let Some(assigned_to) = &self.assigned_to {
            patch.insert(fields::ASSIGNED_TO.into(), set_value(assigned_to));
        }
        if let Some(tags) = &self.tags {
            patch.insert(fields::TAGS.into(), set_value(tags));
        }
        if let Some(budget) = self.budget {
            patch.insert(
                fields::BUDGET.into(),
                budget_value(budget.map(Money::from_major)),
            );
        }
        patch.insert(fields::UPDATED_AT.into(), timestamp_value(&now));
        patch
    }
}

/// Parameters for adding a task to a planning.
///
/// Tasks start `pending` at 0% and are appended after their last sibling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTask {
    pub planning_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: TaskPriority,
    pub start_date: Date,
    pub due_date: Date,
    #[serde(default)]
    pub assigned_to: BTreeSet<String>,
    /// Parent task for subtasks, `None` for a root task
    #[serde(default)]
    pub parent_task_id: Option<String>,
}

impl CreateTask {
    pub fn validate(&self) -> Result<()> {
        require_text("title", &self.title)?;
        require_range("start_date", self.start_date, "due_date", self.due_date)
    }
}

/// Partial update of a task's descriptive fields.
///
/// Status and progress are changed through their dedicated operations so the
/// two stay consistent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub start_date: Option<Date>,
    pub due_date: Option<Date>,
    pub assigned_to: Option<BTreeSet<String>>,
}

impl UpdateTask {
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let (Some(start), Some(due)) = (self.start_date, self.due_date) {
            require_range("start_date", start, "due_date", due)?;
        }
        Ok(())
    }

    pub fn to_patch(&self, now: Timestamp) -> Record {
        let mut patch = Record::new();
        if let Some(title) = &self.title {
            patch.insert(fields::TITLE.into(), Value::from(title.as_str()));
        }
        if let Some(description) = &self.description {
            patch.insert(fields::DESCRIPTION.into(), Value::from(description.as_str()));
        }
        if let Some(priority) = self.priority {
            patch.insert(fields::PRIORITY.into(), Value::from(priority.as_str()));
        }
        if let Some(start) = &self.start_date {
            patch.insert(fields::START_DATE.into(), date_value(start));
        }
        if let Some(due) = &self.due_date {
            patch.insert(fields::DUE_DATE.into(), date_value(due));
        }
        if let Some(assigned_to) = &self.assigned_to {
            patch.insert(fields::ASSIGNED_TO.into(), set_value(assigned_to));
        }
        patch.insert(fields::UPDATED_AT.into(), timestamp_value(&now));
        patch
    }
}

/// A file to attach to a planning or one of its tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadDocument {
    pub planning_id: String,
    #[serde(default)]
    pub task_id: Option<String>,
    /// Original file name; also the blob name and the document's display name
    pub file_name: String,
    /// MIME type
    pub content_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl UploadDocument {
    pub fn validate(&self) -> Result<()> {
        require_text("file_name", &self.file_name)?;
        if self.file_name.contains(['/', '\\']) || self.file_name == ".." {
            return Err(PlanningError::invalid_input("file_name")
                .with_reason("must be a plain file name without directories"));
        }
        Ok(())
    }
}

/// Metadata changes for an uploaded document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateDocument {
    pub name: Option<String>,
    /// `Some(None)` removes the description
    pub description: Option<Option<String>>,
}

impl UpdateDocument {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        Ok(())
    }

    pub fn to_patch(&self) -> Record {
        let mut patch = Record::new();
        if let Some(name) = &self.name {
            patch.insert(fields::NAME.into(), Value::from(name.as_str()));
        }
        if let Some(description) = &self.description {
            patch.insert(
                fields::DESCRIPTION.into(),
                opt_string_value(description.as_deref()),
            );
        }
        patch
    }
}

/// A new comment on a planning or one of its tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateComment {
    pub planning_id: String,
    #[serde(default)]
    pub task_id: Option<String>,
    pub text: String,
}

impl CreateComment {
    pub fn validate(&self) -> Result<()> {
        require_text("text", &self.text)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use serde_json::json;

    use super::*;

    fn create_planning() -> CreatePlanning {
        CreatePlanning {
            title: "Pool season".to_string(),
            description: String::new(),
            planning_type: PlanningType::Monthly,
            start_date: date(2024, 1, 1),
            end_date: date(2024, 1, 31),
            assigned_to: BTreeSet::new(),
            tags: BTreeSet::new(),
            budget: Some(1500.50),
        }
    }

    #[test]
    fn test_create_planning_validation() {
        assert!(create_planning().validate().is_ok());

        let mut blank = create_planning();
        blank.title = "  ".to_string();
        assert!(matches!(
            blank.validate(),
            Err(PlanningError::InvalidInput { ref field, .. }) if field == "title"
        ));

        let mut reversed = create_planning();
        reversed.end_date = date(2023, 12, 31);
        assert!(reversed.validate().is_err());

        let mut negative = create_planning();
        negative.budget = Some(-1.0);
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_budget_upper_bound() {
        let mut largest = create_planning();
        largest.budget = Some(Money::MAX_MAJOR);
        assert!(largest.validate().is_ok());

        let mut huge = create_planning();
        huge.budget = Some(1e300);
        assert!(matches!(
            huge.validate(),
            Err(PlanningError::InvalidInput { ref field, .. }) if field == "budget"
        ));

        let update = UpdatePlanning {
            budget: Some(Some(Money::MAX_MAJOR * 2.0)),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_update_planning_patch_only_has_present_fields() {
        let now = Timestamp::from_second(1_704_067_200).unwrap();
        let update = UpdatePlanning {
            title: Some("Renamed".to_string()),
            budget: Some(Some(1500.50)),
            ..Default::default()
        };
        let patch = update.to_patch(now);

        assert_eq!(patch.len(), 3);
        assert_eq!(patch["title"], json!("Renamed"));
        assert_eq!(patch["budget"], json!(150050));
        assert!(patch.contains_key("updatedAt"));
    }

    #[test]
    fn test_update_planning_can_clear_budget() {
        let update = UpdatePlanning {
            budget: Some(None),
            ..Default::default()
        };
        let patch = update.to_patch(Timestamp::UNIX_EPOCH);
        assert_eq!(patch["budget"], Value::Null);
    }

    #[test]
    fn test_upload_rejects_nested_file_names() {
        let upload = UploadDocument {
            planning_id: "p1".to_string(),
            task_id: None,
            file_name: "../secrets.txt".to_string(),
            content_type: "text/plain".to_string(),
            description: None,
            bytes: Vec::new(),
        };
        assert!(upload.validate().is_err());
    }

    #[test]
    fn test_update_task_patch() {
        let update = UpdateTask {
            priority: Some(TaskPriority::Urgent),
            ..Default::default()
        };
        let patch = update.to_patch(Timestamp::UNIX_EPOCH);
        assert_eq!(patch["priority"], json!("urgent"));
        assert!(!patch.contains_key("status"));
        assert!(!patch.contains_key("progress"));
    }
}
