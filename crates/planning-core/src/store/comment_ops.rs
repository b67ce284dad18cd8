//! Comment operations. Only the author may edit or delete a comment.

use jiff::Timestamp;
use log::{debug, info};
use serde_json::Value;

use super::{decode_all, PlanningStore};
use crate::{
    backend::{OrderBy, Record, StoragePath},
    context::TenantContext,
    error::{PlanningError, Result},
    models::{
        record::{fields, timestamp_value},
        Planning, PlanningComment, PlanningTask, RecordCodec,
    },
    params::CreateComment,
};

impl PlanningStore {
    /// Loads the comments of a planning, oldest first.
    pub async fn list_comments(&self, planning_id: &str) -> Option<Vec<PlanningComment>> {
        self.run("list_comments", async {
            let ctx = self.context().await?;
            self.refresh_comments(&ctx, planning_id).await
        })
        .await
    }

    /// Posts a comment as the current user.
    pub async fn add_comment(&self, params: CreateComment) -> Option<PlanningComment> {
        self.run("add_comment", self.try_add_comment(params)).await
    }

    /// Replaces the text of one of the caller's comments.
    pub async fn update_comment(
        &self,
        planning_id: &str,
        comment_id: &str,
        text: &str,
    ) -> Option<PlanningComment> {
        self.run("update_comment", async {
            if text.trim().is_empty() {
                return Err(PlanningError::invalid_input("text").with_reason("must not be empty"));
            }
            let ctx = self.context().await?;
            let path = ctx.comment(planning_id, comment_id)?;
            self.authored_comment(&ctx, &path).await?;

            let mut patch = Record::new();
            patch.insert(fields::TEXT.into(), Value::from(text));
            patch.insert(fields::UPDATED_AT.into(), timestamp_value(&Timestamp::now()));
            self.records.patch(&path, patch).await?;
            debug!("updated comment {comment_id}");

            self.refresh_comments(&ctx, planning_id).await?;
            self.load(&path).await
        })
        .await
    }

    /// Deletes one of the caller's comments.
    pub async fn delete_comment(&self, planning_id: &str, comment_id: &str) -> Option<()> {
        self.run("delete_comment", async {
            let ctx = self.context().await?;
            let path = ctx.comment(planning_id, comment_id)?;
            self.authored_comment(&ctx, &path).await?;

            self.records.delete(&path).await?;
            info!("deleted comment {comment_id}");

            self.refresh_comments(&ctx, planning_id).await?;
            Ok(())
        })
        .await
    }

    pub(super) async fn fetch_comments(
        &self,
        ctx: &TenantContext,
        planning_id: &str,
    ) -> Result<Vec<PlanningComment>> {
        let records = self
            .records
            .query(
                &ctx.comments(planning_id)?,
                &[],
                Some(&OrderBy::asc(fields::CREATED_AT)),
            )
            .await?;
        let comments: Vec<PlanningComment> = decode_all(records);
        debug!(
            "loaded {} comment(s) of planning {planning_id}",
            comments.len()
        );
        Ok(comments)
    }

    pub(super) async fn refresh_comments(
        &self,
        ctx: &TenantContext,
        planning_id: &str,
    ) -> Result<Vec<PlanningComment>> {
        let comments = self.fetch_comments(ctx, planning_id).await?;
        let loaded = comments.clone();
        self.state.send_modify(|state| state.comments = loaded);
        Ok(comments)
    }

    /// Loads a comment, failing with `Forbidden` unless the caller wrote it.
    async fn authored_comment(
        &self,
        ctx: &TenantContext,
        path: &StoragePath,
    ) -> Result<PlanningComment> {
        let comment: PlanningComment = self.load(path).await?;
        if !comment.is_authored_by(&ctx.user_id) {
            return Err(PlanningError::Forbidden {
                reason: format!(
                    "comment {} was written by another user",
                    comment.id
                ),
            });
        }
        Ok(comment)
    }

    async fn try_add_comment(&self, params: CreateComment) -> Result<PlanningComment> {
        params.validate()?;
        let ctx = self.context().await?;
        let planning_id = params.planning_id.as_str();
        let _: Planning = self.load(&ctx.planning(planning_id)?).await?;
        if let Some(task_id) = &params.task_id {
            let _: PlanningTask = self.load(&ctx.task(planning_id, task_id)?).await?;
        }

        let comment = PlanningComment {
            id: String::new(),
            planning_id: params.planning_id.clone(),
            task_id: params.task_id,
            text: params.text,
            created_at: Timestamp::now(),
            created_by: ctx.user_id.clone(),
            updated_at: None,
        };

        let id = self
            .records
            .create(&ctx.comments(planning_id)?, comment.encode())
            .await?;
        info!("added comment {id} to planning {planning_id}");

        self.refresh_comments(&ctx, planning_id).await?;
        Ok(PlanningComment { id, ..comment })
    }
}
