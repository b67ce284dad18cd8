//! Conversion between raw backend records and domain entities.
//!
//! Records are loosely shaped JSON objects. Decoding never fails on shape:
//! every absent or malformed field takes a literal default (empty string,
//! empty set, zero, `None`, the default enum variant, the Unix epoch for
//! dates) so no half-filled value leaks into the domain types. Budgets are
//! kept in cents at rest.

use std::collections::BTreeSet;
use std::str::FromStr;

use jiff::{civil::Date, Timestamp};
use serde_json::Value;

use super::{
    Money, Planning, PlanningComment, PlanningDocument, PlanningTask,
};
use crate::backend::Record;

/// Field names as persisted.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const TYPE: &str = "type";
    pub const STATUS: &str = "status";
    pub const PRIORITY: &str = "priority";
    pub const START_DATE: &str = "startDate";
    pub const END_DATE: &str = "endDate";
    pub const DUE_DATE: &str = "dueDate";
    pub const COMPLETED_DATE: &str = "completedDate";
    pub const PROGRESS: &str = "progress";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
    pub const CREATED_BY: &str = "createdBy";
    pub const ASSIGNED_TO: &str = "assignedTo";
    pub const TAGS: &str = "tags";
    pub const BUDGET: &str = "budget";
    pub const PLANNING_ID: &str = "planningId";
    pub const TASK_ID: &str = "taskId";
    pub const PARENT_TASK_ID: &str = "parentTaskId";
    pub const ORDER: &str = "order";
    pub const NAME: &str = "name";
    pub const FILE_URL: &str = "fileUrl";
    pub const FILE_TYPE: &str = "fileType";
    pub const FILE_SIZE: &str = "fileSize";
    pub const UPLOADED_AT: &str = "uploadedAt";
    pub const UPLOADED_BY: &str = "uploadedBy";
    pub const TEXT: &str = "text";
}

/// An entity that round-trips through a backend record.
pub trait RecordCodec: Sized {
    /// Human-readable entity name used in errors.
    const ENTITY: &'static str;

    /// Builds the entity from the record stored under `id`.
    fn decode(id: &str, record: &Record) -> Self;

    /// Full record for the entity. The identifier is not part of the record;
    /// it is the last segment of the storage path.
    fn encode(&self) -> Record;
}

/// Formats an instant with fixed nanosecond precision so stored timestamps
/// sort lexically in chronological order.
pub fn format_timestamp(ts: &Timestamp) -> String {
    format!("{ts:.9}")
}

pub(crate) fn timestamp_value(ts: &Timestamp) -> Value {
    Value::String(format_timestamp(ts))
}

pub(crate) fn date_value(date: &Date) -> Value {
    Value::String(date.to_string())
}

pub(crate) fn set_value(set: &BTreeSet<String>) -> Value {
    Value::Array(set.iter().cloned().map(Value::String).collect())
}

pub(crate) fn opt_string_value(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |s| Value::String(s.to_string()))
}

pub(crate) fn budget_value(budget: Option<Money>) -> Value {
    budget.map_or(Value::Null, |m| Value::from(m.minor()))
}

fn string(record: &Record, key: &str) -> String {
    opt_string(record, key).unwrap_or_default()
}

fn opt_string(record: &Record, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(String::from)
}

fn unsigned(record: &Record, key: &str) -> u64 {
    match record.get(key) {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .unwrap_or(0),
        _ => 0,
    }
}

fn progress(record: &Record) -> u8 {
    unsigned(record, fields::PROGRESS).min(100) as u8
}

fn string_set(record: &Record, key: &str) -> BTreeSet<String> {
    record
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn parsed<T: FromStr + Default>(record: &Record, key: &str) -> T {
    record
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

fn date(record: &Record, key: &str) -> Date {
    record
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Date>().ok())
        .unwrap_or(jiff::civil::date(1970, 1, 1))
}

fn opt_timestamp(record: &Record, key: &str) -> Option<Timestamp> {
    record
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Timestamp>().ok())
}

fn timestamp(record: &Record, key: &str) -> Timestamp {
    opt_timestamp(record, key).unwrap_or(Timestamp::UNIX_EPOCH)
}

fn budget(record: &Record) -> Option<Money> {
    match record.get(fields::BUDGET) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .map(Money::from_minor),
        _ => None,
    }
}

impl RecordCodec for Planning {
    const ENTITY: &'static str = "Planning";

    fn decode(id: &str, record: &Record) -> Self {
        Self {
            id: id.to_string(),
            title: string(record, fields::TITLE),
            description: string(record, fields::DESCRIPTION),
            planning_type: parsed(record, fields::TYPE),
            status: parsed(record, fields::STATUS),
            start_date: date(record, fields::START_DATE),
            end_date: date(record, fields::END_DATE),
            progress: progress(record),
            created_at: timestamp(record, fields::CREATED_AT),
            updated_at: timestamp(record, fields::UPDATED_AT),
            created_by: string(record, fields::CREATED_BY),
            assigned_to: string_set(record, fields::ASSIGNED_TO),
            tags: string_set(record, fields::TAGS),
            budget: budget(record),
        }
    }

    fn encode(&self) -> Record {
        let mut record = Record::new();
        record.insert(fields::TITLE.into(), Value::from(self.title.as_str()));
        record.insert(fields::DESCRIPTION.into(), Value::from(self.description.as_str()));
        record.insert(fields::TYPE.into(), Value::from(self.planning_type.as_str()));
        record.insert(fields::STATUS.into(), Value::from(self.status.as_str()));
        record.insert(fields::START_DATE.into(), date_value(&self.start_date));
        record.insert(fields::END_DATE.into(), date_value(&self.end_date));
        record.insert(fields::PROGRESS.into(), Value::from(self.progress));
        record.insert(fields::CREATED_AT.into(), timestamp_value(&self.created_at));
        record.insert(fields::UPDATED_AT.into(), timestamp_value(&self.updated_at));
        record.insert(fields::CREATED_BY.into(), Value::from(self.created_by.as_str()));
        record.insert(fields::ASSIGNED_TO.into(), set_value(&self.assigned_to));
        record.insert(fields::TAGS.into(), set_value(&self.tags));
        if self.budget.is_some() {
            record.insert(fields::BUDGET.into(), budget_value(self.budget));
        }
        record
    }
}

impl RecordCodec for PlanningTask {
    const ENTITY: &'static str = "Task";

    fn decode(id: &str, record: &Record) -> Self {
        Self {
            id: id.to_string(),
            planning_id: string(record, fields::PLANNING_ID),
            title: string(record, fields::TITLE),
            description: string(record, fields::DESCRIPTION),
            status: parsed(record, fields::STATUS),
            priority: parsed(record, fields::PRIORITY),
            start_date: date(record, fields::START_DATE),
            due_date: date(record, fields::DUE_DATE),
            completed_date: opt_timestamp(record, fields::COMPLETED_DATE),
            assigned_to: string_set(record, fields::ASSIGNED_TO),
            progress: progress(record),
            created_at: timestamp(record, fields::CREATED_AT),
            updated_at: timestamp(record, fields::UPDATED_AT),
            parent_task_id: opt_string(record, fields::PARENT_TASK_ID),
            order: unsigned(record, fields::ORDER).min(u64::from(u32::MAX)) as u32,
        }
    }

    fn encode(&self) -> Record {
        let mut record = Record::new();
        record.insert(fields::PLANNING_ID.into(), Value::from(self.planning_id.as_str()));
        record.insert(fields::TITLE.into(), Value::from(self.title.as_str()));
        record.insert(fields::DESCRIPTION.into(), Value::from(self.description.as_str()));
        record.insert(fields::STATUS.into(), Value::from(self.status.as_str()));
        record.insert(fields::PRIORITY.into(), Value::from(self.priority.as_str()));
        record.insert(fields::START_DATE.into(), date_value(&self.start_date));
        record.insert(fields::DUE_DATE.into(), date_value(&self.due_date));
        record.insert(
            fields::COMPLETED_DATE.into(),
            self.completed_date.as_ref().map_or(Value::Null, timestamp_value),
        );
        record.insert(fields::ASSIGNED_TO.into(), set_value(&self.assigned_to));
        record.insert(fields::PROGRESS.into(), Value::from(self.progress));
        record.insert(fields::CREATED_AT.into(), timestamp_value(&self.created_at));
        record.insert(fields::UPDATED_AT.into(), timestamp_value(&self.updated_at));
        record.insert(
            fields::PARENT_TASK_ID.into(),
            opt_string_value(self.parent_task_id.as_deref()),
        );
        record.insert(fields::ORDER.into(), Value::from(self.order));
        record
    }
}

impl RecordCodec for PlanningDocument {
    const ENTITY: &'static str = "Document";

    fn decode(id: &str, record: &Record) -> Self {
        Self {
            id: id.to_string(),
            planning_id: string(record, fields::PLANNING_ID),
            task_id: opt_string(record, fields::TASK_ID),
            name: string(record, fields::NAME),
            description: opt_string(record, fields::DESCRIPTION),
            file_url: string(record, fields::FILE_URL),
            file_type: string(record, fields::FILE_TYPE),
            file_size: unsigned(record, fields::FILE_SIZE),
            uploaded_at: timestamp(record, fields::UPLOADED_AT),
            uploaded_by: string(record, fields::UPLOADED_BY),
        }
    }

    fn encode(&self) -> Record {
        let mut record = Record::new();
        record.insert(fields::PLANNING_ID.into(), Value::from(self.planning_id.as_str()));
        record.insert(fields::TASK_ID.into(), opt_string_value(self.task_id.as_deref()));
        record.insert(fields::NAME.into(), Value::from(self.name.as_str()));
        record.insert(
            fields::DESCRIPTION.into(),
            opt_string_value(self.description.as_deref()),
        );
        record.insert(fields::FILE_URL.into(), Value::from(self.file_url.as_str()));
        record.insert(fields::FILE_TYPE.into(), Value::from(self.file_type.as_str()));
        record.insert(fields::FILE_SIZE.into(), Value::from(self.file_size));
        record.insert(fields::UPLOADED_AT.into(), timestamp_value(&self.uploaded_at));
        record.insert(fields::UPLOADED_BY.into(), Value::from(self.uploaded_by.as_str()));
        record
    }
}

impl RecordCodec for PlanningComment {
    const ENTITY: &'static str = "Comment";

    fn decode(id: &str, record: &Record) -> Self {
        Self {
            id: id.to_string(),
            planning_id: string(record, fields::PLANNING_ID),
            task_id: opt_string(record, fields::TASK_ID),
            text: string(record, fields::TEXT),
            created_at: timestamp(record, fields::CREATED_AT),
            created_by: string(record, fields::CREATED_BY),
            updated_at: opt_timestamp(record, fields::UPDATED_AT),
        }
    }

    fn encode(&self) -> Record {
        let mut record = Record::new();
        record.insert(fields::PLANNING_ID.into(), Value::from(self.planning_id.as_str()));
        record.insert(fields::TASK_ID.into(), opt_string_value(self.task_id.as_deref()));
        record.insert(fields::TEXT.into(), Value::from(self.text.as_str()));
        record.insert(fields::CREATED_AT.into(), timestamp_value(&self.created_at));
        record.insert(fields::CREATED_BY.into(), Value::from(self.created_by.as_str()));
        if let Some(updated_at) = &self.updated_at {
            record.insert(fields::UPDATED_AT.into(), timestamp_value(updated_at));
        }
        record
    }
}
