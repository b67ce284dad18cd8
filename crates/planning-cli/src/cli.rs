//! Command-line argument definitions using clap.
//!
//! Argument structs carry the clap attributes and convert into the core
//! parameter types through `From`, so the core crate stays free of CLI
//! concerns:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → PlanningStore
//! ```

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use jiff::civil::Date;
use planning_core::{
    params::{CreateComment, CreatePlanning, CreateTask, UpdateDocument, UpdatePlanning, UpdateTask},
    PlanningStatus, PlanningType, TaskPriority, TaskStatus,
};

// ============================================================================
// Plannings
// ============================================================================

/// Create a new planning
///
/// The planning starts as a draft with no progress.
#[derive(Args)]
pub struct CreatePlanningArgs {
    /// Title of the planning
    pub title: String,
    #[arg(short, long, help = "Longer description of the planning")]
    pub description: Option<String>,
    #[arg(long = "type", value_enum, default_value_t = PlanningTypeArg::Monthly)]
    pub planning_type: PlanningTypeArg,
    #[arg(long, help = "First day of the planning (YYYY-MM-DD)")]
    pub start: Date,
    #[arg(long, help = "Last day of the planning (YYYY-MM-DD)")]
    pub end: Date,
    #[arg(
        short,
        long,
        value_delimiter = ',',
        help = "Responsible users as comma-separated list"
    )]
    pub assign: Vec<String>,
    #[arg(long, value_delimiter = ',', help = "Tags as comma-separated list")]
    pub tags: Vec<String>,
    #[arg(short, long, help = "Budget in currency units, e.g. 1500.50")]
    pub budget: Option<f64>,
}

impl From<CreatePlanningArgs> for CreatePlanning {
    fn from(val: CreatePlanningArgs) -> Self {
        CreatePlanning {
            title: val.title,
            description: val.description.unwrap_or_default(),
            planning_type: val.planning_type.into(),
            start_date: val.start,
            end_date: val.end,
            assigned_to: val.assign.into_iter().collect(),
            tags: val.tags.into_iter().collect(),
            budget: val.budget,
        }
    }
}

/// Show a planning with its tasks, documents and comments
#[derive(Args)]
pub struct ShowPlanningArgs {
    #[arg(help = "Identifier of the planning to show")]
    pub id: String,
}

/// Update a planning's details
///
/// Only the given fields change. Use `status` to move the planning through
/// its lifecycle.
#[derive(Args)]
pub struct UpdatePlanningArgs {
    #[arg(help = "Identifier of the planning to update")]
    pub id: String,
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(long = "type", value_enum)]
    pub planning_type: Option<PlanningTypeArg>,
    #[arg(long)]
    pub start: Option<Date>,
    #[arg(long)]
    pub end: Option<Date>,
    #[arg(
        short,
        long,
        value_delimiter = ',',
        help = "Replaces the responsible users"
    )]
    pub assign: Option<Vec<String>>,
    #[arg(long, value_delimiter = ',', help = "Replaces the tags")]
    pub tags: Option<Vec<String>>,
    #[arg(short, long, conflicts_with = "clear_budget")]
    pub budget: Option<f64>,
    #[arg(long, help = "Remove the budget")]
    pub clear_budget: bool,
}

impl From<UpdatePlanningArgs> for UpdatePlanning {
    fn from(val: UpdatePlanningArgs) -> Self {
        let budget = if val.clear_budget {
            Some(None)
        } else {
            val.budget.map(Some)
        };
        UpdatePlanning {
            title: val.title,
            description: val.description,
            planning_type: val.planning_type.map(Into::into),
            status: None,
            start_date: val.start,
            end_date: val.end,
            assigned_to: val.assign.map(|a| a.into_iter().collect()),
            tags: val.tags.map(|t| t.into_iter().collect()),
            budget,
        }
    }
}

/// Change the status of a planning
///
/// Any status may follow any other.
#[derive(Args)]
pub struct PlanningStatusArgs {
    pub id: String,
    #[arg(value_enum)]
    pub status: PlanningStatusArg,
}

/// Delete a planning with all its tasks, documents and comments
#[derive(Args)]
pub struct DeletePlanningArgs {
    pub id: String,
}

#[derive(Subcommand)]
pub enum PlanningCommands {
    /// Create a new planning
    #[command(alias = "c")]
    Create(CreatePlanningArgs),
    /// List the plannings of the unit
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show a planning with its tasks, documents and comments
    #[command(alias = "s")]
    Show(ShowPlanningArgs),
    /// Update a planning's details
    #[command(alias = "u")]
    Update(UpdatePlanningArgs),
    /// Change the status of a planning
    Status(PlanningStatusArgs),
    /// Delete a planning permanently
    #[command(aliases = ["d", "rm"])]
    Delete(DeletePlanningArgs),
}

// ============================================================================
// Tasks
// ============================================================================

/// Add a task to a planning
///
/// The task is appended after its last sibling. Pass `--parent` to create a
/// subtask.
#[derive(Args)]
pub struct AddTaskArgs {
    #[arg(help = "Identifier of the planning to add the task to")]
    pub planning_id: String,
    pub title: String,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(short, long, value_enum, default_value_t = TaskPriorityArg::Medium)]
    pub priority: TaskPriorityArg,
    #[arg(long, help = "Start date (YYYY-MM-DD)")]
    pub start: Date,
    #[arg(long, help = "Due date (YYYY-MM-DD)")]
    pub due: Date,
    #[arg(short, long, value_delimiter = ',')]
    pub assign: Vec<String>,
    #[arg(long, help = "Identifier of the parent task")]
    pub parent: Option<String>,
}

impl From<AddTaskArgs> for CreateTask {
    fn from(val: AddTaskArgs) -> Self {
        CreateTask {
            planning_id: val.planning_id,
            title: val.title,
            description: val.description.unwrap_or_default(),
            priority: val.priority.into(),
            start_date: val.start,
            due_date: val.due,
            assigned_to: val.assign.into_iter().collect(),
            parent_task_id: val.parent,
        }
    }
}

#[derive(Args)]
pub struct ListTasksArgs {
    pub planning_id: String,
}

/// Update a task's details
///
/// Status and progress have their own commands.
#[derive(Args)]
pub struct UpdateTaskArgs {
    pub planning_id: String,
    pub task_id: String,
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(short, long, value_enum)]
    pub priority: Option<TaskPriorityArg>,
    #[arg(long)]
    pub start: Option<Date>,
    #[arg(long)]
    pub due: Option<Date>,
    #[arg(short, long, value_delimiter = ',')]
    pub assign: Option<Vec<String>>,
}

impl From<UpdateTaskArgs> for UpdateTask {
    fn from(val: UpdateTaskArgs) -> Self {
        UpdateTask {
            title: val.title,
            description: val.description,
            priority: val.priority.map(Into::into),
            start_date: val.start,
            due_date: val.due,
            assigned_to: val.assign.map(|a| a.into_iter().collect()),
        }
    }
}

/// Change a task's status
///
/// Completing sets progress to 100, pending resets it to 0 and starting a
/// task that is at 0 or 100 puts it at 50.
#[derive(Args)]
pub struct TaskStatusArgs {
    pub planning_id: String,
    pub task_id: String,
    #[arg(value_enum)]
    pub status: TaskStatusArg,
}

/// Set a task's progress
///
/// The status follows: 0 is pending, 100 is completed and anything between
/// is in progress.
#[derive(Args)]
pub struct TaskProgressArgs {
    pub planning_id: String,
    pub task_id: String,
    #[arg(help = "Progress percentage between 0 and 100")]
    pub progress: u8,
}

/// Delete a task and its direct subtasks
#[derive(Args)]
pub struct DeleteTaskArgs {
    pub planning_id: String,
    pub task_id: String,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to a planning
    #[command(alias = "a")]
    Add(AddTaskArgs),
    /// List the tasks of a planning as a tree
    #[command(aliases = ["l", "ls"])]
    List(ListTasksArgs),
    /// Update a task's details
    #[command(alias = "u")]
    Update(UpdateTaskArgs),
    /// Change a task's status
    Status(TaskStatusArgs),
    /// Set a task's progress
    #[command(alias = "p")]
    Progress(TaskProgressArgs),
    /// Delete a task and its direct subtasks
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteTaskArgs),
}

// ============================================================================
// Documents
// ============================================================================

/// Upload a file to a planning or one of its tasks
#[derive(Args)]
pub struct UploadDocumentArgs {
    pub planning_id: String,
    #[arg(help = "File to upload")]
    pub file: PathBuf,
    #[arg(long, help = "Attach the document to this task")]
    pub task: Option<String>,
    #[arg(long, help = "MIME type; guessed from the extension when omitted")]
    pub content_type: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct ListDocumentsArgs {
    pub planning_id: String,
    #[arg(long, help = "Only documents attached to this task")]
    pub task: Option<String>,
}

/// Rename a document or change its description
#[derive(Args)]
pub struct UpdateDocumentArgs {
    pub planning_id: String,
    pub document_id: String,
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(short, long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    #[arg(long)]
    pub clear_description: bool,
}

impl From<UpdateDocumentArgs> for UpdateDocument {
    fn from(val: UpdateDocumentArgs) -> Self {
        let description = if val.clear_description {
            Some(None)
        } else {
            val.description.map(Some)
        };
        UpdateDocument {
            name: val.name,
            description,
        }
    }
}

#[derive(Args)]
pub struct DeleteDocumentArgs {
    pub planning_id: String,
    pub document_id: String,
}

#[derive(Subcommand)]
pub enum DocumentCommands {
    /// Upload a file
    Upload(UploadDocumentArgs),
    /// List documents, newest first
    #[command(aliases = ["l", "ls"])]
    List(ListDocumentsArgs),
    /// Rename a document or change its description
    #[command(alias = "u")]
    Update(UpdateDocumentArgs),
    /// Delete a document and its file
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteDocumentArgs),
}

// ============================================================================
// Comments
// ============================================================================

#[derive(Args)]
pub struct AddCommentArgs {
    pub planning_id: String,
    pub text: String,
    #[arg(long, help = "Comment on this task")]
    pub task: Option<String>,
}

impl From<AddCommentArgs> for CreateComment {
    fn from(val: AddCommentArgs) -> Self {
        CreateComment {
            planning_id: val.planning_id,
            task_id: val.task,
            text: val.text,
        }
    }
}

#[derive(Args)]
pub struct ListCommentsArgs {
    pub planning_id: String,
    #[arg(long, help = "Only comments on this task")]
    pub task: Option<String>,
}

/// Replace the text of one of your comments
#[derive(Args)]
pub struct EditCommentArgs {
    pub planning_id: String,
    pub comment_id: String,
    pub text: String,
}

/// Delete one of your comments
#[derive(Args)]
pub struct DeleteCommentArgs {
    pub planning_id: String,
    pub comment_id: String,
}

#[derive(Subcommand)]
pub enum CommentCommands {
    /// Comment on a planning or task
    #[command(alias = "a")]
    Add(AddCommentArgs),
    /// List comments, oldest first
    #[command(aliases = ["l", "ls"])]
    List(ListCommentsArgs),
    /// Replace the text of one of your comments
    #[command(alias = "e")]
    Edit(EditCommentArgs),
    /// Delete one of your comments
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteCommentArgs),
}

// ============================================================================
// Value enums
// ============================================================================

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum PlanningTypeArg {
    Monthly,
    Quarterly,
    Biannual,
    Annual,
}

impl From<PlanningTypeArg> for PlanningType {
    fn from(val: PlanningTypeArg) -> Self {
        match val {
            PlanningTypeArg::Monthly => PlanningType::Monthly,
            PlanningTypeArg::Quarterly => PlanningType::Quarterly,
            PlanningTypeArg::Biannual => PlanningType::Biannual,
            PlanningTypeArg::Annual => PlanningType::Annual,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum PlanningStatusArg {
    Draft,
    InProgress,
    Completed,
    Cancelled,
}

impl From<PlanningStatusArg> for PlanningStatus {
    fn from(val: PlanningStatusArg) -> Self {
        match val {
            PlanningStatusArg::Draft => PlanningStatus::Draft,
            PlanningStatusArg::InProgress => PlanningStatus::InProgress,
            PlanningStatusArg::Completed => PlanningStatus::Completed,
            PlanningStatusArg::Cancelled => PlanningStatus::Cancelled,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum TaskStatusArg {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl From<TaskStatusArg> for TaskStatus {
    fn from(val: TaskStatusArg) -> Self {
        match val {
            TaskStatusArg::Pending => TaskStatus::Pending,
            TaskStatusArg::InProgress => TaskStatus::InProgress,
            TaskStatusArg::Completed => TaskStatus::Completed,
            TaskStatusArg::Cancelled => TaskStatus::Cancelled,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum TaskPriorityArg {
    Low,
    Medium,
    High,
    Urgent,
}

impl From<TaskPriorityArg> for TaskPriority {
    fn from(val: TaskPriorityArg) -> Self {
        match val {
            TaskPriorityArg::Low => TaskPriority::Low,
            TaskPriorityArg::Medium => TaskPriority::Medium,
            TaskPriorityArg::High => TaskPriority::High,
            TaskPriorityArg::Urgent => TaskPriority::Urgent,
        }
    }
}
