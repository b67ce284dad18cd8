//! Data models for plannings, tasks, documents and comments.
//!
//! Display implementations for these models live in
//! [`crate::display::models`], keeping presentation apart from the data
//! structures.
//!
//! - [`planning`], [`task`], [`document`], [`comment`]: the four entities
//! - [`status`]: planning types, statuses and task priorities
//! - [`money`]: budgets in minor units
//! - [`transition`]: the task status/progress relation
//! - [`tree`]: parent/child index built on demand over a flat task list
//! - [`record`]: decoding and encoding of raw backend records
//!
//! # Examples
//!
//! ```rust
//! use planning_core::models::{Money, PlanningStatus, TaskStatus};
//!
//! assert_eq!(PlanningStatus::default(), PlanningStatus::Draft);
//! assert_eq!(TaskStatus::for_progress(100), TaskStatus::Completed);
//! assert_eq!(Money::from_major(1500.50).minor(), 150050);
//! ```

pub mod comment;
pub mod document;
pub mod money;
pub mod planning;
pub mod record;
pub mod status;
pub mod task;
pub mod transition;
pub mod tree;


pub use comment::PlanningComment;
pub use document::PlanningDocument;
pub use money::Money;
pub use planning::Planning;
pub use record::RecordCodec;
pub use status::{PlanningStatus, PlanningType, TaskPriority, TaskStatus};
pub use task::PlanningTask;
pub use transition::{CompletionChange, TaskTransition};
pub use tree::TaskTree;
