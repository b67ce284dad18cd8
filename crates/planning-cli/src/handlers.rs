//! Command handlers.
//!
//! Each handler calls one store operation and renders its result. The store
//! reports failures by returning `None` and recording the error in its
//! state; [`Cli::expect_some`] turns that into an `anyhow` error so the
//! process exits non-zero.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use planning_core::{
    display::{Comments, Documents, OperationStatus, Plannings, Tasks},
    params::UploadDocument,
    PlanningStore,
};

use crate::{
    cli::{
        CommentCommands, DocumentCommands, PlanningCommands, TaskCommands, UpdateDocumentArgs,
        UpdatePlanningArgs, UpdateTaskArgs, UploadDocumentArgs,
    },
    renderer::TerminalRenderer,
};

pub struct Cli {
    store: PlanningStore,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(store: PlanningStore, renderer: TerminalRenderer) -> Self {
        Self { store, renderer }
    }

    fn expect_some<T>(&self, result: Option<T>, action: &str) -> Result<T> {
        result.ok_or_else(|| match self.store.last_error() {
            Some(error) => anyhow!("Failed to {action}: {}", error.message),
            None => anyhow!("Failed to {action}"),
        })
    }

    fn confirm(&self, message: String) -> Result<()> {
        self.renderer
            .render(&OperationStatus::success(message).to_string())
    }

    pub async fn list_plannings(&self) -> Result<()> {
        let plannings = self.store.list_plannings().await;
        let plannings = self.expect_some(plannings, "list plannings")?;
        self.renderer
            .render(&format!("# Plannings\n\n{}", Plannings(plannings)))
    }

    pub async fn handle_planning_command(&self, command: PlanningCommands) -> Result<()> {
        match command {
            PlanningCommands::Create(args) => {
                let planning = self.store.create_planning(args.into()).await;
                let planning = self.expect_some(planning, "create planning")?;
                self.renderer.render(&planning.to_string())
            }
            PlanningCommands::List => self.list_plannings().await,
            PlanningCommands::Show(args) => self.show_planning(&args.id).await,
            PlanningCommands::Update(args) => self.update_planning(args).await,
            PlanningCommands::Status(args) => {
                let planning = self
                    .store
                    .set_planning_status(&args.id, args.status.into())
                    .await;
                let planning = self.expect_some(planning, "change planning status")?;
                self.confirm(format!(
                    "Planning {} is now {}",
                    planning.id, planning.status
                ))
            }
            PlanningCommands::Delete(args) => {
                let deleted = self.store.delete_planning(&args.id).await;
                self.expect_some(deleted, "delete planning")?;
                self.confirm(format!("Deleted planning {}", args.id))
            }
        }
    }

    async fn show_planning(&self, planning_id: &str) -> Result<()> {
        let planning = self.store.get_planning(planning_id).await;
        let planning = self.expect_some(planning, "show planning")?;
        let state = self.store.state();

        let mut output = planning.to_string();
        output.push_str(&format!("\n## Tasks\n\n{}", Tasks(state.tasks)));
        output.push_str(&format!("\n## Documents\n\n{}", Documents(state.documents)));
        output.push_str(&format!("\n## Comments\n\n{}", Comments(state.comments)));
        self.renderer.render(&output)
    }

    async fn update_planning(&self, args: UpdatePlanningArgs) -> Result<()> {
        let planning_id = args.id.clone();
        let planning = self.store.update_planning(&planning_id, args.into()).await;
        let planning = self.expect_some(planning, "update planning")?;
        self.renderer.render(&planning.to_string())
    }

    pub async fn handle_task_command(&self, command: TaskCommands) -> Result<()> {
        match command {
            TaskCommands::Add(args) => {
                let task = self.store.add_task(args.into()).await;
                let task = self.expect_some(task, "add task")?;
                self.renderer.render(&task.to_string())
            }
            TaskCommands::List(args) => {
                let tasks = self.store.list_tasks(&args.planning_id).await;
                let tasks = self.expect_some(tasks, "list tasks")?;
                self.renderer.render(&format!("# Tasks\n\n{}", Tasks(tasks)))
            }
            TaskCommands::Update(args) => self.update_task(args).await,
            TaskCommands::Status(args) => {
                let task = self
                    .store
                    .set_task_status(&args.planning_id, &args.task_id, args.status.into())
                    .await;
                let task = self.expect_some(task, "change task status")?;
                self.renderer.render(&task.to_string())
            }
            TaskCommands::Progress(args) => {
                let task = self
                    .store
                    .set_task_progress(&args.planning_id, &args.task_id, args.progress)
                    .await;
                let task = self.expect_some(task, "set task progress")?;
                self.renderer.render(&task.to_string())
            }
            TaskCommands::Delete(args) => {
                let deleted = self
                    .store
                    .delete_task(&args.planning_id, &args.task_id)
                    .await;
                self.expect_some(deleted, "delete task")?;
                self.confirm(format!("Deleted task {} and its subtasks", args.task_id))
            }
        }
    }

    async fn update_task(&self, args: UpdateTaskArgs) -> Result<()> {
        let planning_id = args.planning_id.clone();
        let task_id = args.task_id.clone();
        let task = self
            .store
            .update_task(&planning_id, &task_id, args.into())
            .await;
        let task = self.expect_some(task, "update task")?;
        self.renderer.render(&task.to_string())
    }

    pub async fn handle_document_command(&self, command: DocumentCommands) -> Result<()> {
        match command {
            DocumentCommands::Upload(args) => self.upload_document(args).await,
            DocumentCommands::List(args) => {
                let documents = self.store.list_documents(&args.planning_id).await;
                let mut documents = self.expect_some(documents, "list documents")?;
                if let Some(task_id) = &args.task {
                    documents.retain(|d| d.task_id.as_deref() == Some(task_id.as_str()));
                }
                self.renderer
                    .render(&format!("# Documents\n\n{}", Documents(documents)))
            }
            DocumentCommands::Update(args) => self.update_document(args).await,
            DocumentCommands::Delete(args) => {
                let deleted = self
                    .store
                    .delete_document(&args.planning_id, &args.document_id)
                    .await;
                self.expect_some(deleted, "delete document")?;
                self.confirm(format!("Deleted document {}", args.document_id))
            }
        }
    }

    async fn upload_document(&self, args: UploadDocumentArgs) -> Result<()> {
        let bytes = tokio::fs::read(&args.file)
            .await
            .with_context(|| format!("Failed to read {}", args.file.display()))?;
        let file_name = args
            .file
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from)
            .ok_or_else(|| anyhow!("{} has no usable file name", args.file.display()))?;
        let content_type = args
            .content_type
            .unwrap_or_else(|| guess_content_type(&args.file).to_string());

        let document = self
            .store
            .upload_document(UploadDocument {
                planning_id: args.planning_id,
                task_id: args.task,
                file_name,
                content_type,
                description: args.description,
                bytes,
            })
            .await;
        let document = self.expect_some(document, "upload document")?;
        self.renderer.render(&document.to_string())
    }

    async fn update_document(&self, args: UpdateDocumentArgs) -> Result<()> {
        let planning_id = args.planning_id.clone();
        let document_id = args.document_id.clone();
        let document = self
            .store
            .update_document(&planning_id, &document_id, args.into())
            .await;
        let document = self.expect_some(document, "update document")?;
        self.renderer.render(&document.to_string())
    }

    pub async fn handle_comment_command(&self, command: CommentCommands) -> Result<()> {
        match command {
            CommentCommands::Add(args) => {
                let comment = self.store.add_comment(args.into()).await;
                let comment = self.expect_some(comment, "add comment")?;
                self.renderer.render(&comment.to_string())
            }
            CommentCommands::List(args) => {
                let comments = self.store.list_comments(&args.planning_id).await;
                self.expect_some(comments, "list comments")?;
                let state = self.store.state();
                let comments = match &args.task {
                    Some(task_id) => state
                        .comments_for_task(task_id)
                        .into_iter()
                        .cloned()
                        .collect(),
                    None => state.comments,
                };
                self.renderer
                    .render(&format!("# Comments\n\n{}", Comments(comments)))
            }
            CommentCommands::Edit(args) => {
                let comment = self
                    .store
                    .update_comment(&args.planning_id, &args.comment_id, &args.text)
                    .await;
                let comment = self.expect_some(comment, "edit comment")?;
                self.renderer.render(&comment.to_string())
            }
            CommentCommands::Delete(args) => {
                let deleted = self
                    .store
                    .delete_comment(&args.planning_id, &args.comment_id)
                    .await;
                self.expect_some(deleted, "delete comment")?;
                self.confirm(format!("Deleted comment {}", args.comment_id))
            }
        }
    }
}

/// MIME type from a file extension, `application/octet-stream` if unknown.
fn guess_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("quote.PDF")), "application/pdf");
        assert_eq!(guess_content_type(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(
            guess_content_type(Path::new("no_extension")),
            "application/octet-stream"
        );
    }
}
