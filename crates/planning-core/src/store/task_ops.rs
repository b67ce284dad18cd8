//! Task operations.
//!
//! After every task mutation the task list is re-fetched and the owning
//! planning's progress is recomputed from it.

use jiff::Timestamp;
use log::{debug, info};
use serde_json::Value;

use super::{decode_all, PlanningStore};
use crate::{
    backend::{Filter, OrderBy, Record},
    context::TenantContext,
    error::{PlanningError, Result},
    models::{
        record::{fields, timestamp_value},
        Planning, PlanningTask, RecordCodec, TaskStatus, TaskTransition,
    },
    params::{CreateTask, UpdateTask},
};

impl PlanningStore {
    /// Loads the tasks of a planning, ordered by sibling order.
    pub async fn list_tasks(&self, planning_id: &str) -> Option<Vec<PlanningTask>> {
        self.run("list_tasks", async {
            let ctx = self.context().await?;
            self.refresh_tasks(&ctx, planning_id).await
        })
        .await
    }

    /// Adds a pending task after the last of its siblings.
    pub async fn add_task(&self, params: CreateTask) -> Option<PlanningTask> {
        self.run("add_task", self.try_add_task(params)).await
    }

    /// Updates a task's descriptive fields.
    pub async fn update_task(
        &self,
        planning_id: &str,
        task_id: &str,
        params: UpdateTask,
    ) -> Option<PlanningTask> {
        self.run(
            "update_task",
            self.try_update_task(planning_id, task_id, params),
        )
        .await
    }

    /// Changes a task's status, adjusting its progress to match.
    pub async fn set_task_status(
        &self,
        planning_id: &str,
        task_id: &str,
        status: TaskStatus,
    ) -> Option<PlanningTask> {
        self.run("set_task_status", async {
            let ctx = self.context().await?;
            let task: PlanningTask = self.load(&ctx.task(planning_id, task_id)?).await?;
            let now = Timestamp::now();
            let transition = TaskTransition::to_status(&task, status, now);
            self.apply_transition(&ctx, planning_id, task, transition, now)
                .await
        })
        .await
    }

    /// Changes a task's progress (0 to 100), adjusting its status to match.
    pub async fn set_task_progress(
        &self,
        planning_id: &str,
        task_id: &str,
        progress: u8,
    ) -> Option<PlanningTask> {
        self.run("set_task_progress", async {
            let ctx = self.context().await?;
            let task: PlanningTask = self.load(&ctx.task(planning_id, task_id)?).await?;
            let now = Timestamp::now();
            let transition = TaskTransition::to_progress(&task, progress, now)?;
            self.apply_transition(&ctx, planning_id, task, transition, now)
                .await
        })
        .await
    }

    /// Deletes a task and its direct subtasks.
    ///
    /// Deeper descendants are left in place and show up as root tasks.
    pub async fn delete_task(&self, planning_id: &str, task_id: &str) -> Option<()> {
        self.run("delete_task", self.try_delete_task(planning_id, task_id))
            .await
    }

    pub(super) async fn fetch_tasks(
        &self,
        ctx: &TenantContext,
        planning_id: &str,
    ) -> Result<Vec<PlanningTask>> {
        let records = self
            .records
            .query(&ctx.tasks(planning_id)?, &[], Some(&OrderBy::asc(fields::ORDER)))
            .await?;
        let tasks: Vec<PlanningTask> = decode_all(records);
        debug!("loaded {} task(s) of planning {planning_id}", tasks.len());
        Ok(tasks)
    }

    pub(super) async fn refresh_tasks(
        &self,
        ctx: &TenantContext,
        planning_id: &str,
    ) -> Result<Vec<PlanningTask>> {
        let tasks = self.fetch_tasks(ctx, planning_id).await?;
        let loaded = tasks.clone();
        self.state.send_modify(|state| state.tasks = loaded);
        self.sync_progress(ctx, planning_id, &tasks).await?;
        Ok(tasks)
    }

    async fn try_add_task(&self, params: CreateTask) -> Result<PlanningTask> {
        params.validate()?;
        let ctx = self.context().await?;
        let planning_id = params.planning_id.as_str();
        let _: Planning = self.load(&ctx.planning(planning_id)?).await?;

        let parent = match &params.parent_task_id {
            Some(parent_id) => {
                let _: PlanningTask = self.load(&ctx.task(planning_id, parent_id)?).await?;
                Value::from(parent_id.as_str())
            }
            None => Value::Null,
        };
        let siblings = self
            .records
            .query(
                &ctx.tasks(planning_id)?,
                &[Filter::equals(fields::PARENT_TASK_ID, parent)],
                None,
            )
            .await?;
        let order = decode_all::<PlanningTask>(siblings)
            .iter()
            .map(|t| t.order + 1)
            .max()
            .unwrap_or(0);

        let now = Timestamp::now();
        let task = PlanningTask {
            id: String::new(),
            planning_id: params.planning_id.clone(),
            title: params.title,
            description: params.description,
            status: TaskStatus::Pending,
            priority: params.priority,
            start_date: params.start_date,
            due_date: params.due_date,
            completed_date: None,
            assigned_to: params.assigned_to,
            progress: 0,
            created_at: now,
            updated_at: now,
            parent_task_id: params.parent_task_id,
            order,
        };

        let id = self
            .records
            .create(&ctx.tasks(planning_id)?, task.encode())
            .await?;
        info!("added task {id} to planning {planning_id} at position {order}");

        self.refresh_tasks(&ctx, planning_id).await?;
        Ok(PlanningTask { id, ..task })
    }

    async fn try_update_task(
        &self,
        planning_id: &str,
        task_id: &str,
        params: UpdateTask,
    ) -> Result<PlanningTask> {
        params.validate()?;
        let ctx = self.context().await?;
        let path = ctx.task(planning_id, task_id)?;
        let existing: PlanningTask = self.load(&path).await?;

        let start = params.start_date.unwrap_or(existing.start_date);
        let due = params.due_date.unwrap_or(existing.due_date);
        if due < start {
            return Err(PlanningError::invalid_input("due_date")
                .with_reason(format!("{due} is before start_date {start}")));
        }

        self.records
            .patch(&path, params.to_patch(Timestamp::now()))
            .await?;
        debug!("updated task {task_id}");

        self.refresh_tasks(&ctx, planning_id).await?;
        self.load(&path).await
    }

    async fn apply_transition(
        &self,
        ctx: &TenantContext,
        planning_id: &str,
        mut task: PlanningTask,
        transition: TaskTransition,
        now: Timestamp,
    ) -> Result<PlanningTask> {
        let previous = task.status;
        transition.apply(&mut task, now);

        let mut patch = Record::new();
        patch.insert(fields::STATUS.into(), Value::from(task.status.as_str()));
        patch.insert(fields::PROGRESS.into(), Value::from(task.progress));
        patch.insert(
            fields::COMPLETED_DATE.into(),
            task.completed_date.as_ref().map_or(Value::Null, timestamp_value),
        );
        patch.insert(fields::UPDATED_AT.into(), timestamp_value(&now));
        self.records
            .patch(&ctx.task(planning_id, &task.id)?, patch)
            .await?;
        info!(
            "task {} {} -> {} at {}%",
            task.id,
            previous.as_str(),
            task.status.as_str(),
            task.progress
        );

        self.refresh_tasks(ctx, planning_id).await?;
        Ok(task)
    }

    async fn try_delete_task(&self, planning_id: &str, task_id: &str) -> Result<()> {
        let ctx = self.context().await?;
        let path = ctx.task(planning_id, task_id)?;
        let _: PlanningTask = self.load(&path).await?;

        let children = self
            .records
            .query(
                &ctx.tasks(planning_id)?,
                &[Filter::equals(fields::PARENT_TASK_ID, task_id)],
                None,
            )
            .await?;
        for child in &children {
            self.records.delete(&ctx.task(planning_id, &child.id)?).await?;
        }
        self.records.delete(&path).await?;
        info!("deleted task {task_id} and {} subtask(s)", children.len());

        self.refresh_tasks(&ctx, planning_id).await?;
        Ok(())
    }
}
