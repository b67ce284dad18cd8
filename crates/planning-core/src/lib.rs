//! Core library for condominium planning.
//!
//! Plannings are time-boxed initiatives of a condominium (a unit of a tenant
//! organization). Each planning owns a flat list of tasks that may nest one
//! under another, uploaded documents and a comment thread. A planning's
//! progress is always derived from its tasks.
//!
//! # Layers
//!
//! - [`store`]: the [`PlanningStore`] state container and every operation
//!   views call
//! - [`backend`]: the document and blob store seams with in-memory, SQLite
//!   and filesystem implementations
//! - [`context`]: tenant/unit/user resolution and storage path layout
//! - [`models`]: domain entities, the task state machine and record codecs
//! - [`display`]: markdown `Display` implementations for terminal output
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use jiff::civil::date;
//! use planning_core::{
//!     backend::{MemoryBlobStore, MemoryDocumentStore},
//!     context::SessionResolver,
//!     models::PlanningType,
//!     params::CreatePlanning,
//!     PlanningStoreBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PlanningStoreBuilder::new()
//!     .with_document_store(Arc::new(MemoryDocumentStore::new()))
//!     .with_blob_store(Arc::new(MemoryBlobStore::new()))
//!     .with_resolver(Arc::new(SessionResolver::signed_in("org", "tower-a", "ana")))
//!     .build()
//!     .await?;
//!
//! let planning = store
//!     .create_planning(CreatePlanning {
//!         title: "Facade painting".to_string(),
//!         description: String::new(),
//!         planning_type: PlanningType::Quarterly,
//!         start_date: date(2024, 4, 1),
//!         end_date: date(2024, 6, 30),
//!         assigned_to: Default::default(),
//!         tags: Default::default(),
//!         budget: Some(12_000.0),
//!     })
//!     .await;
//!
//! match planning {
//!     Some(planning) => println!("{planning}"),
//!     None => eprintln!("{:?}", store.last_error()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod context;
pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod progress;
pub mod store;

// Re-export commonly used types
pub use context::{SessionResolver, TenantContext, TenantResolver};
pub use display::{Comments, Documents, LocalDateTime, OperationStatus, Plannings, Tasks};
pub use error::{ErrorKind, PlanningError, Result};
pub use models::{
    Money, Planning, PlanningComment, PlanningDocument, PlanningStatus, PlanningTask,
    PlanningType, TaskPriority, TaskStatus, TaskTree,
};
pub use params::{
    CreateComment, CreatePlanning, CreateTask, UpdateDocument, UpdatePlanning, UpdateTask,
    UploadDocument,
};
pub use store::{PlanningStore, PlanningStoreBuilder, StoreError, StoreState};
