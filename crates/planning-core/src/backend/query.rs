//! Query filters and ordering shared by the document store implementations.

use std::cmp::Ordering;

use serde_json::Value;

use super::StoredRecord;

/// Equality filter on a top-level field. An absent field equals `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether the record satisfies the filter.
    pub fn matches(&self, record: &StoredRecord) -> bool {
        record.record.get(&self.field).unwrap_or(&Value::Null) == &self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Sort key for query results.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }

    /// Compares two records on the sort field, falling back to the record
    /// identifier so results are deterministic.
    pub fn compare(&self, a: &StoredRecord, b: &StoredRecord) -> Ordering {
        let ordering = compare_values(a.record.get(&self.field), b.record.get(&self.field))
            .then_with(|| a.id.cmp(&b.id));
        match self.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

/// Missing and `null` sort first, numbers numerically, strings lexically.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Filters and sorts records the same way for every backend.
pub fn apply<I>(records: I, filters: &[Filter], order_by: Option<&OrderBy>) -> Vec<StoredRecord>
where
    I: IntoIterator<Item = StoredRecord>,
{
    let mut matched: Vec<StoredRecord> = records
        .into_iter()
        .filter(|r| filters.iter().all(|f| f.matches(r)))
        .collect();

    if let Some(order) = order_by {
        matched.sort_by(|a, b| order.compare(a, b));
    }
    matched
}
