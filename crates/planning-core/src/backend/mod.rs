//! Persistence backends for planning data.
//!
//! The store talks to two collaborators:
//!
//! - a [`DocumentStore`]: hierarchical collections of JSON records addressed
//!   by [`StoragePath`], with filtered and ordered queries
//! - a [`BlobStore`]: raw file contents, addressed by the retrieval URL it
//!   hands back on upload
//!
//! ```text
//! tenant/{tenant}/unit/{unit}/planning/{planning}
//!                                              ├── tasks/{task}
//!                                              ├── documents/{document}
//!                                              └── comments/{comment}
//! ```
//!
//! Implementations:
//!
//! - [`memory`]: in-process maps, used by tests and embedders
//! - [`sqlite`]: a single SQLite table of JSON records
//! - [`blob`]: in-memory and filesystem blob stores

use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{PlanningError, Result};

pub mod blob;
pub mod memory;
pub mod query;
pub mod sqlite;

pub use blob::{FsBlobStore, MemoryBlobStore};
pub use memory::MemoryDocumentStore;
pub use query::{Direction, Filter, OrderBy};
pub use sqlite::SqliteDocumentStore;

/// A raw backend record: a JSON object without its identifier.
pub type Record = Map<String, Value>;

/// A record returned by a query, paired with its identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: String,
    pub record: Record,
}

/// Slash-separated location of a collection or a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoragePath(String);

impl StoragePath {
    /// Builds a path from its segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = segments
            .into_iter()
            .map(|s| s.as_ref().trim_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        Self(joined)
    }

    /// Checks that `id` names exactly one path segment.
    ///
    /// # Errors
    ///
    /// `PlanningError::InvalidInput` on `field` for an empty id, `.`, `..`
    /// or an id containing a path separator.
    pub fn segment<'a>(field: &str, id: &'a str) -> Result<&'a str> {
        if id.trim().is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
            return Err(PlanningError::invalid_input(field)
                .with_reason(format!("'{id}' is not a valid identifier")));
        }
        Ok(id)
    }

    /// Appends a segment.
    pub fn join(&self, segment: impl AsRef<str>) -> Self {
        Self::new([self.0.as_str(), segment.as_ref()])
    }

    /// Path without its last segment.
    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once('/')
            .map(|(parent, _)| Self(parent.to_string()))
    }

    /// Last segment: the record identifier for record paths.
    pub fn last_segment(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// Whether `self` equals `prefix` or lies below it.
    pub fn starts_with(&self, prefix: &StoragePath) -> bool {
        self.0 == prefix.0
            || self
                .0
                .strip_prefix(prefix.0.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Document-store style persistence.
///
/// Identifiers are assigned by the backend on [`DocumentStore::create`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Records of `collection` matching every filter, optionally ordered.
    async fn query(
        &self,
        collection: &StoragePath,
        filters: &[Filter],
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<StoredRecord>>;

    /// The record at `path`, if any.
    async fn get(&self, path: &StoragePath) -> Result<Option<Record>>;

    /// Stores a new record in `collection` and returns its identifier.
    async fn create(&self, collection: &StoragePath, record: Record) -> Result<String>;

    /// Replaces the record at `path`.
    async fn put(&self, path: &StoragePath, record: Record) -> Result<()>;

    /// Overwrites the given fields of the existing record at `path`.
    ///
    /// Fails with `NotFound` when there is no record.
    async fn patch(&self, path: &StoragePath, partial: Record) -> Result<()>;

    /// Removes the record at `path`. Removing a missing record succeeds.
    async fn delete(&self, path: &StoragePath) -> Result<()>;
}

/// File content storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` at `path` and returns the retrieval URL.
    async fn put(&self, path: &StoragePath, bytes: Vec<u8>, content_type: &str) -> Result<String>;

    /// Deletes a blob by retrieval URL or by storage path.
    async fn delete(&self, url_or_path: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_building() {
        let base = StoragePath::new(["tenant", "t1", "unit", "u1", "planning"]);
        let task = base.join("p1").join("tasks").join("x");
        assert_eq!(task.as_str(), "tenant/t1/unit/u1/planning/p1/tasks/x");
        assert_eq!(task.last_segment(), "x");
        assert_eq!(
            task.parent().unwrap().as_str(),
            "tenant/t1/unit/u1/planning/p1/tasks"
        );
    }

    #[test]
    fn test_starts_with_respects_segments() {
        let p1 = StoragePath::new(["planning", "p1"]);
        assert!(StoragePath::new(["planning", "p1", "tasks", "a"]).starts_with(&p1));
        assert!(p1.starts_with(&p1));
        assert!(!StoragePath::new(["planning", "p10"]).starts_with(&p1));
    }

    #[test]
    fn test_segments_are_trimmed() {
        let path = StoragePath::new(["/a/", "", "b"]);
        assert_eq!(path.as_str(), "a/b");
    }
}
