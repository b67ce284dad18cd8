//! Caller and tenant context.
//!
//! Every store operation starts by resolving who is calling and which
//! organization and unit the data belongs to. All storage paths are
//! namespaced by that context.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    backend::StoragePath,
    error::{PlanningError, Result},
};

pub const PLANNINGS: &str = "planning";
pub const TASKS: &str = "tasks";
pub const DOCUMENTS: &str = "documents";
pub const COMMENTS: &str = "comments";

/// Resolved scope of a store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    /// Organization the caller acts for
    pub tenant_id: String,
    /// Selected sub-unit (condominium)
    pub unit_id: String,
    /// The authenticated caller
    pub user_id: String,
}

impl TenantContext {
    pub fn new(
        tenant_id: impl Into<String>,
        unit_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            unit_id: unit_id.into(),
            user_id: user_id.into(),
        }
    }

    /// `tenant/{tenant}/unit/{unit}/planning`
    pub fn plannings(&self) -> StoragePath {
        StoragePath::new([
            "tenant",
            self.tenant_id.as_str(),
            "unit",
            self.unit_id.as_str(),
            PLANNINGS,
        ])
    }

    /// Path of one planning.
    ///
    /// Every id taken from a caller goes through [`StoragePath::segment`], so
    /// an id can never reach into another collection.
    ///
    /// # Errors
    ///
    /// `PlanningError::InvalidInput` when `planning_id` is not a single
    /// path segment.
    pub fn planning(&self, planning_id: &str) -> Result<StoragePath> {
        let planning_id = StoragePath::segment("planning_id", planning_id)?;
        Ok(self.plannings().join(planning_id))
    }

    pub fn tasks(&self, planning_id: &str) -> Result<StoragePath> {
        Ok(self.planning(planning_id)?.join(TASKS))
    }

    pub fn task(&self, planning_id: &str, task_id: &str) -> Result<StoragePath> {
        let task_id = StoragePath::segment("task_id", task_id)?;
        Ok(self.tasks(planning_id)?.join(task_id))
    }

    pub fn documents(&self, planning_id: &str) -> Result<StoragePath> {
        Ok(self.planning(planning_id)?.join(DOCUMENTS))
    }

    pub fn document(&self, planning_id: &str, document_id: &str) -> Result<StoragePath> {
        let document_id = StoragePath::segment("document_id", document_id)?;
        Ok(self.documents(planning_id)?.join(document_id))
    }

    pub fn comments(&self, planning_id: &str) -> Result<StoragePath> {
        Ok(self.planning(planning_id)?.join(COMMENTS))
    }

    pub fn comment(&self, planning_id: &str, comment_id: &str) -> Result<StoragePath> {
        let comment_id = StoragePath::segment("comment_id", comment_id)?;
        Ok(self.comments(planning_id)?.join(comment_id))
    }

    /// Blob location for an uploaded file:
    /// `.../planning/{planning}[/tasks/{task}]/documents/{file_name}`.
    ///
    /// The location depends only on the scope and the file name, so a second
    /// upload of the same name into the same scope replaces the stored
    /// contents and both documents then point at the newer file.
    pub fn blob(
        &self,
        planning_id: &str,
        task_id: Option<&str>,
        file_name: &str,
    ) -> Result<StoragePath> {
        let scope = match task_id {
            Some(task_id) => self.task(planning_id, task_id)?,
            None => self.planning(planning_id)?,
        };
        let file_name = StoragePath::segment("file_name", file_name)?;
        Ok(scope.join(DOCUMENTS).join(file_name))
    }
}

/// Source of the caller's tenant context.
#[async_trait]
pub trait TenantResolver: Send + Sync {
    /// Resolves the current context.
    ///
    /// # Errors
    ///
    /// `PlanningError::Unauthenticated` when there is no session and
    /// `PlanningError::NoUnitSelected` when no unit is selected.
    async fn resolve(&self) -> Result<TenantContext>;
}

#[derive(Debug, Clone, Default)]
struct Session {
    user_id: Option<String>,
    tenant_id: String,
    unit_id: Option<String>,
}

/// Resolver backed by a switchable session.
///
/// Clones share the session, so a view can sign in or switch units while the
/// store keeps resolving through its own handle.
#[derive(Debug, Clone, Default)]
pub struct SessionResolver {
    session: Arc<RwLock<Session>>,
}

impl SessionResolver {
    /// A resolver with no signed-in user.
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver with a signed-in user and a selected unit.
    pub fn signed_in(
        tenant_id: impl Into<String>,
        unit_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            session: Arc::new(RwLock::new(Session {
                user_id: Some(user_id.into()),
                tenant_id: tenant_id.into(),
                unit_id: Some(unit_id.into()),
            })),
        }
    }

    /// Starts a session for `user_id` in `tenant_id` with no unit selected.
    pub async fn sign_in(&self, tenant_id: impl Into<String>, user_id: impl Into<String>) {
        let mut session = self.session.write().await;
        session.tenant_id = tenant_id.into();
        session.user_id = Some(user_id.into());
        session.unit_id = None;
    }

    /// Ends the session.
    pub async fn sign_out(&self) {
        *self.session.write().await = Session::default();
    }

    /// Selects (or clears) the active unit.
    pub async fn select_unit(&self, unit_id: Option<String>) {
        self.session.write().await.unit_id = unit_id;
    }
}

#[async_trait]
impl TenantResolver for SessionResolver {
    async fn resolve(&self) -> Result<TenantContext> {
        let session = self.session.read().await;

        let user_id = session
            .user_id
            .clone()
            .ok_or(PlanningError::Unauthenticated)?;
        let unit_id = session
            .unit_id
            .clone()
            .filter(|u| !u.is_empty())
            .ok_or(PlanningError::NoUnitSelected)?;

        Ok(TenantContext {
            tenant_id: session.tenant_id.clone(),
            unit_id,
            user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_paths_are_namespaced() {
        let ctx = TenantContext::new("org", "tower-a", "ana");
        assert_eq!(
            ctx.task("p1", "t1").unwrap().as_str(),
            "tenant/org/unit/tower-a/planning/p1/tasks/t1"
        );
        assert_eq!(
            ctx.comments("p1").unwrap().as_str(),
            "tenant/org/unit/tower-a/planning/p1/comments"
        );
        assert_eq!(
            ctx.blob("p1", Some("t1"), "quote.pdf").unwrap().as_str(),
            "tenant/org/unit/tower-a/planning/p1/tasks/t1/documents/quote.pdf"
        );
        assert_eq!(
            ctx.blob("p1", None, "quote.pdf").unwrap().as_str(),
            "tenant/org/unit/tower-a/planning/p1/documents/quote.pdf"
        );
    }

    #[test]
    fn test_ids_must_be_single_segments() {
        let ctx = TenantContext::new("org", "tower-a", "ana");

        for bad in ["", " ", ".", "..", "p1/comments/c1", "p1\\tasks"] {
            let err = ctx.planning(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{bad:?}");
        }
        assert!(matches!(
            ctx.comment("p1", "c1/../c2"),
            Err(PlanningError::InvalidInput { field, .. }) if field == "comment_id"
        ));
        assert!(ctx.task("p1", "..").is_err());
        assert!(ctx.document("p1", "d1/x").is_err());
        assert!(ctx.blob("p1", None, "..").is_err());
    }

    #[tokio::test]
    async fn test_session_resolution() {
        let resolver = SessionResolver::new();
        assert!(matches!(resolver.resolve().await, Err(PlanningError::Unauthenticated)));

        resolver.sign_in("org", "ana").await;
        assert!(matches!(resolver.resolve().await, Err(PlanningError::NoUnitSelected)));

        resolver.select_unit(Some("tower-a".to_string())).await;
        let ctx = resolver.resolve().await.unwrap();
        assert_eq!(ctx, TenantContext::new("org", "tower-a", "ana"));

        resolver.sign_out().await;
        assert!(matches!(resolver.resolve().await, Err(PlanningError::Unauthenticated)));
    }
}
