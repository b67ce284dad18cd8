//! Planning operations.

use jiff::Timestamp;
use log::{debug, info};
use serde_json::Value;

use super::{decode_all, PlanningStore};
use crate::{
    backend::{OrderBy, Record},
    context::TenantContext,
    error::{PlanningError, Result},
    models::{
        record::{fields, timestamp_value},
        Money, Planning, PlanningComment, PlanningDocument, PlanningStatus, PlanningTask,
        RecordCodec,
    },
    params::{CreatePlanning, UpdatePlanning},
    progress::aggregate_progress,
};

impl PlanningStore {
    /// Loads the plannings of the selected unit, newest first.
    pub async fn list_plannings(&self) -> Option<Vec<Planning>> {
        self.run("list_plannings", async {
            let ctx = self.context().await?;
            self.refresh_plannings(&ctx).await
        })
        .await
    }

    /// Opens a planning: it becomes the current planning and its tasks,
    /// documents and comments are loaded.
    pub async fn get_planning(&self, planning_id: &str) -> Option<Planning> {
        self.run("get_planning", self.open_planning(planning_id)).await
    }

    /// Creates a draft planning with no progress.
    pub async fn create_planning(&self, params: CreatePlanning) -> Option<Planning> {
        self.run("create_planning", self.try_create_planning(params))
            .await
    }

    /// Applies a partial update to a planning.
    pub async fn update_planning(
        &self,
        planning_id: &str,
        params: UpdatePlanning,
    ) -> Option<Planning> {
        self.run("update_planning", self.try_update_planning(planning_id, params))
            .await
    }

    /// Moves a planning to `status`. Any status may follow any other.
    pub async fn set_planning_status(
        &self,
        planning_id: &str,
        status: PlanningStatus,
    ) -> Option<Planning> {
        let params = UpdatePlanning {
            status: Some(status),
            ..Default::default()
        };
        self.run(
            "set_planning_status",
            self.try_update_planning(planning_id, params),
        )
        .await
    }

    /// Deletes a planning with all of its tasks, documents and comments.
    pub async fn delete_planning(&self, planning_id: &str) -> Option<()> {
        self.run("delete_planning", self.try_delete_planning(planning_id))
            .await
    }

    /// Forgets the current planning and its loaded collections.
    pub fn clear_current_planning(&self) {
        self.state.send_modify(|state| {
            state.current_planning = None;
            state.tasks.clear();
            state.documents.clear();
            state.comments.clear();
        });
    }

    pub(super) async fn refresh_plannings(&self, ctx: &TenantContext) -> Result<Vec<Planning>> {
        let records = self
            .records
            .query(&ctx.plannings(), &[], Some(&OrderBy::desc(fields::CREATED_AT)))
            .await?;
        let plannings: Vec<Planning> = decode_all(records);
        debug!("loaded {} planning(s)", plannings.len());

        let loaded = plannings.clone();
        self.state.send_modify(|state| state.plannings = loaded);
        Ok(plannings)
    }

    /// Recomputes a planning's progress from `tasks` and persists it when it
    /// changed.
    pub(super) async fn sync_progress(
        &self,
        ctx: &TenantContext,
        planning_id: &str,
        tasks: &[PlanningTask],
    ) -> Result<()> {
        let path = ctx.planning(planning_id)?;
        let Some(record) = self.records.get(&path).await? else {
            return Ok(());
        };
        let planning = Planning::decode(planning_id, &record);

        let progress = aggregate_progress(tasks);
        if progress == planning.progress {
            return Ok(());
        }

        let now = Timestamp::now();
        let mut patch = Record::new();
        patch.insert(fields::PROGRESS.into(), Value::from(progress));
        patch.insert(fields::UPDATED_AT.into(), timestamp_value(&now));
        self.records.patch(&path, patch).await?;
        info!(
            "planning {planning_id} progress {} -> {progress}",
            planning.progress
        );

        self.state.send_modify(|state| {
            let entries = state
                .current_planning
                .iter_mut()
                .chain(state.plannings.iter_mut())
                .filter(|p| p.id == planning_id);
            for entry in entries {
                entry.progress = progress;
                entry.updated_at = now;
            }
        });
        Ok(())
    }

    async fn open_planning(&self, planning_id: &str) -> Result<Planning> {
        let ctx = self.context().await?;
        let path = ctx.planning(planning_id)?;
        let _: Planning = self.load(&path).await?;

        // Nothing is published until every collection has loaded.
        let tasks = self.fetch_tasks(&ctx, planning_id).await?;
        let documents = self.fetch_documents(&ctx, planning_id).await?;
        let comments = self.fetch_comments(&ctx, planning_id).await?;
        self.sync_progress(&ctx, planning_id, &tasks).await?;
        let planning: Planning = self.load(&path).await?;

        let current = planning.clone();
        self.state.send_modify(|state| {
            state.current_planning = Some(current);
            state.tasks = tasks;
            state.documents = documents;
            state.comments = comments;
        });
        Ok(planning)
    }

    async fn try_create_planning(&self, params: CreatePlanning) -> Result<Planning> {
        params.validate()?;
        let ctx = self.context().await?;

        let now = Timestamp::now();
        let planning = Planning {
            id: String::new(),
            title: params.title,
            description: params.description,
            planning_type: params.planning_type,
            status: PlanningStatus::Draft,
            start_date: params.start_date,
            end_date: params.end_date,
            progress: 0,
            created_at: now,
            updated_at: now,
            created_by: ctx.user_id.clone(),
            assigned_to: params.assigned_to,
            tags: params.tags,
            budget: params.budget.map(Money::from_major),
        };

        let id = self.records.create(&ctx.plannings(), planning.encode()).await?;
        info!("created planning {id} '{}'", planning.title);

        self.refresh_plannings(&ctx).await?;
        Ok(Planning { id, ..planning })
    }

    async fn try_update_planning(
        &self,
        planning_id: &str,
        params: UpdatePlanning,
    ) -> Result<Planning> {
        params.validate()?;
        let ctx = self.context().await?;
        let path = ctx.planning(planning_id)?;
        let existing: Planning = self.load(&path).await?;

        let start = params.start_date.unwrap_or(existing.start_date);
        let end = params.end_date.unwrap_or(existing.end_date);
        if end < start {
            return Err(PlanningError::invalid_input("end_date")
                .with_reason(format!("{end} is before start_date {start}")));
        }

        self.records
            .patch(&path, params.to_patch(Timestamp::now()))
            .await?;
        debug!("updated planning {planning_id}");

        let updated: Planning = self.load(&path).await?;
        self.refresh_plannings(&ctx).await?;
        if self.state.borrow().is_current(planning_id) {
            let current = updated.clone();
            self.state
                .send_modify(|state| state.current_planning = Some(current));
        }
        Ok(updated)
    }

    async fn try_delete_planning(&self, planning_id: &str) -> Result<()> {
        let ctx = self.context().await?;
        let path = ctx.planning(planning_id)?;
        let _: Planning = self.load(&path).await?;

        let tasks = self.records.query(&ctx.tasks(planning_id)?, &[], None).await?;
        for task in &tasks {
            self.records.delete(&ctx.task(planning_id, &task.id)?).await?;
        }

        let documents: Vec<PlanningDocument> = decode_all(
            self.records
                .query(&ctx.documents(planning_id)?, &[], None)
                .await?,
        );
        for document in &documents {
            self.remove_blob(&document.file_url).await;
            self.records
                .delete(&ctx.document(planning_id, &document.id)?)
                .await?;
        }

        let comments: Vec<PlanningComment> = decode_all(
            self.records
                .query(&ctx.comments(planning_id)?, &[], None)
                .await?,
        );
        for comment in &comments {
            self.records
                .delete(&ctx.comment(planning_id, &comment.id)?)
                .await?;
        }

        self.records.delete(&path).await?;
        info!(
            "deleted planning {planning_id} with {} task(s), {} document(s), {} comment(s)",
            tasks.len(),
            documents.len(),
            comments.len()
        );

        if self.state.borrow().is_current(planning_id) {
            self.clear_current_planning();
        }
        self.refresh_plannings(&ctx).await?;
        Ok(())
    }
}
