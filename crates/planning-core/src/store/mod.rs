//! The planning aggregate store.
//!
//! [`PlanningStore`] is the single entry point views use to read and mutate
//! plannings, tasks, documents and comments. It owns an explicit
//! [`StoreState`] and publishes every change through a `tokio::sync::watch`
//! channel: views either subscribe to it or take snapshots.
//!
//! # Operation contract
//!
//! Every public operation:
//!
//! 1. marks the state as loading and clears the previous error,
//! 2. resolves the caller's tenant context,
//! 3. performs the backend work and re-fetches the affected collections,
//! 4. returns `Some(value)` on success, or `None` after recording a
//!    [`StoreError`] in the state and logging the failure.
//!
//! Failed reads leave the previously loaded collections untouched.
//! Concurrent operations are not coordinated: the last response wins.
//!
//! ## Submodules
//!
//! - [`builder`]: wiring of backends and the tenant resolver
//! - `planning_ops`, `task_ops`, `document_ops`, `comment_ops`: the
//!   operations for each entity

use std::future::Future;
use std::sync::Arc;

use log::error;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::{
    backend::{BlobStore, DocumentStore, StoragePath, StoredRecord},
    context::{TenantContext, TenantResolver},
    error::{ErrorKind, PlanningError, Result},
    models::{Planning, PlanningComment, PlanningDocument, PlanningTask, RecordCodec, TaskTree},
};

pub mod builder;
mod comment_ops;
mod document_ops;
mod planning_ops;
mod task_ops;


pub use builder::PlanningStoreBuilder;

/// Failure recorded by the last operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&PlanningError> for StoreError {
    fn from(error: &PlanningError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Everything a view needs to render the planning screens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    /// Plannings of the selected unit, newest first
    pub plannings: Vec<Planning>,
    /// The planning opened with [`PlanningStore::get_planning`]
    pub current_planning: Option<Planning>,
    /// Tasks of the last listed planning, by sibling order
    pub tasks: Vec<PlanningTask>,
    /// Documents of the last listed planning, newest first
    pub documents: Vec<PlanningDocument>,
    /// Comments of the last listed planning, oldest first
    pub comments: Vec<PlanningComment>,
    pub loading: bool,
    pub error: Option<StoreError>,
}

impl StoreState {
    /// Documents attached to `task_id`.
    pub fn documents_for_task(&self, task_id: &str) -> Vec<&PlanningDocument> {
        self.documents
            .iter()
            .filter(|d| d.task_id.as_deref() == Some(task_id))
            .collect()
    }

    /// Comments left on `task_id`.
    pub fn comments_for_task(&self, task_id: &str) -> Vec<&PlanningComment> {
        self.comments
            .iter()
            .filter(|c| c.task_id.as_deref() == Some(task_id))
            .collect()
    }

    /// Parent/child view over the loaded tasks.
    pub fn task_tree(&self) -> TaskTree<'_> {
        TaskTree::build(&self.tasks)
    }

    fn is_current(&self, planning_id: &str) -> bool {
        self.current_planning
            .as_ref()
            .is_some_and(|p| p.id == planning_id)
    }
}

/// State container and operation surface for plannings.
///
/// Construct one with [`PlanningStoreBuilder`] and share it (usually behind
/// an `Arc`) with every view.
pub struct PlanningStore {
    records: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    resolver: Arc<dyn TenantResolver>,
    state: watch::Sender<StoreState>,
}

impl PlanningStore {
    pub(crate) fn new(
        records: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        resolver: Arc<dyn TenantResolver>,
    ) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            records,
            blobs,
            resolver,
            state,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    /// The error recorded by the last failed operation, if any.
    pub fn last_error(&self) -> Option<StoreError> {
        self.state.borrow().error.clone()
    }

    /// Runs one operation under the store contract.
    async fn run<T, F>(&self, operation: &str, work: F) -> Option<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        match work.await {
            Ok(value) => {
                self.state.send_modify(|state| state.loading = false);
                Some(value)
            }
            Err(e) => {
                error!("{operation} failed: {e}");
                let recorded = StoreError::from(&e);
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(recorded);
                });
                None
            }
        }
    }

    async fn context(&self) -> Result<TenantContext> {
        self.resolver.resolve().await
    }

    /// Reads and decodes the entity at `path`.
    async fn load<T: RecordCodec>(&self, path: &StoragePath) -> Result<T> {
        let id = path.last_segment();
        let record = self
            .records
            .get(path)
            .await?
            .ok_or_else(|| PlanningError::not_found(T::ENTITY, id))?;
        Ok(T::decode(id, &record))
    }

    /// Deletes a blob, logging instead of failing.
    async fn remove_blob(&self, url: &str) {
        if let Err(e) = self.blobs.delete(url).await {
            log::warn!("Failed to delete blob {url}: {e}");
        }
    }
}

fn decode_all<T: RecordCodec>(records: Vec<StoredRecord>) -> Vec<T> {
    records
        .iter()
        .map(|stored| T::decode(&stored.id, &stored.record))
        .collect()
}
