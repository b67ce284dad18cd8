//! Document operations.
//!
//! File contents live in the blob store; the document store keeps the
//! metadata record pointing at them. Blob removal never blocks a metadata
//! change.

use jiff::Timestamp;
use log::{debug, info};

use super::{decode_all, PlanningStore};
use crate::{
    backend::OrderBy,
    context::TenantContext,
    error::Result,
    models::{record::fields, Planning, PlanningDocument, PlanningTask, RecordCodec},
    params::{UpdateDocument, UploadDocument},
};

impl PlanningStore {
    /// Loads the documents of a planning, newest first.
    pub async fn list_documents(&self, planning_id: &str) -> Option<Vec<PlanningDocument>> {
        self.run("list_documents", async {
            let ctx = self.context().await?;
            self.refresh_documents(&ctx, planning_id).await
        })
        .await
    }

    /// Stores a file and records it against a planning or one of its tasks.
    pub async fn upload_document(&self, params: UploadDocument) -> Option<PlanningDocument> {
        self.run("upload_document", self.try_upload_document(params))
            .await
    }

    /// Renames a document or changes its description.
    pub async fn update_document(
        &self,
        planning_id: &str,
        document_id: &str,
        params: UpdateDocument,
    ) -> Option<PlanningDocument> {
        self.run("update_document", async {
            params.validate()?;
            let ctx = self.context().await?;
            let path = ctx.document(planning_id, document_id)?;
            let _: PlanningDocument = self.load(&path).await?;

            self.records.patch(&path, params.to_patch()).await?;
            debug!("updated document {document_id}");

            self.refresh_documents(&ctx, planning_id).await?;
            self.load(&path).await
        })
        .await
    }

    /// Deletes a document and, best effort, its file.
    pub async fn delete_document(&self, planning_id: &str, document_id: &str) -> Option<()> {
        self.run("delete_document", async {
            let ctx = self.context().await?;
            let path = ctx.document(planning_id, document_id)?;
            let document: PlanningDocument = self.load(&path).await?;

            self.remove_blob(&document.file_url).await;
            self.records.delete(&path).await?;
            info!("deleted document {document_id} '{}'", document.name);

            self.refresh_documents(&ctx, planning_id).await?;
            Ok(())
        })
        .await
    }

    pub(super) async fn fetch_documents(
        &self,
        ctx: &TenantContext,
        planning_id: &str,
    ) -> Result<Vec<PlanningDocument>> {
        let records = self
            .records
            .query(
                &ctx.documents(planning_id)?,
                &[],
                Some(&OrderBy::desc(fields::UPLOADED_AT)),
            )
            .await?;
        let documents: Vec<PlanningDocument> = decode_all(records);
        debug!(
            "loaded {} document(s) of planning {planning_id}",
            documents.len()
        );
        Ok(documents)
    }

    pub(super) async fn refresh_documents(
        &self,
        ctx: &TenantContext,
        planning_id: &str,
    ) -> Result<Vec<PlanningDocument>> {
        let documents = self.fetch_documents(ctx, planning_id).await?;
        let loaded = documents.clone();
        self.state.send_modify(|state| state.documents = loaded);
        Ok(documents)
    }

    async fn try_upload_document(&self, params: UploadDocument) -> Result<PlanningDocument> {
        params.validate()?;
        let ctx = self.context().await?;
        let planning_id = params.planning_id.as_str();
        let _: Planning = self.load(&ctx.planning(planning_id)?).await?;
        if let Some(task_id) = &params.task_id {
            let _: PlanningTask = self.load(&ctx.task(planning_id, task_id)?).await?;
        }

        let blob_path = ctx.blob(planning_id, params.task_id.as_deref(), &params.file_name)?;
        let file_size = params.bytes.len() as u64;
        let file_url = self
            .blobs
            .put(&blob_path, params.bytes, &params.content_type)
            .await?;
        debug!("stored {file_size} byte(s) at {file_url}");

        let document = PlanningDocument {
            id: String::new(),
            planning_id: params.planning_id.clone(),
            task_id: params.task_id,
            name: params.file_name,
            description: params.description,
            file_url,
            file_type: params.content_type,
            file_size,
            uploaded_at: Timestamp::now(),
            uploaded_by: ctx.user_id.clone(),
        };

        let id = match self
            .records
            .create(&ctx.documents(planning_id)?, document.encode())
            .await
        {
            Ok(id) => id,
            Err(e) => {
                self.remove_blob(&document.file_url).await;
                return Err(e);
            }
        };
        info!("uploaded document {id} '{}'", document.name);

        self.refresh_documents(&ctx, planning_id).await?;
        Ok(PlanningDocument { id, ..document })
    }
}
