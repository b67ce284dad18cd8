//! Display formatting for domain models and collections.
//!
//! Domain models implement `Display` directly; collections are wrapped in
//! newtypes that handle empty lists and, for tasks, the parent/child layout.
//! All output is markdown so the CLI can render it with termimad.
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrapper types (Plannings, Tasks, Documents,
//!   Comments)
//! - [`status`]: Confirmation messages (OperationStatus)
//! - [`datetime`]: Date/time formatting utilities
//! - [`models`]: Display implementations for domain models

pub mod collections;
pub mod datetime;
pub mod models;
pub mod status;

pub use collections::{Comments, Documents, Plannings, Tasks};
pub use datetime::LocalDateTime;
pub use status::OperationStatus;
