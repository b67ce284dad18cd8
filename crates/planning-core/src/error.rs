//! Error types for the planning library.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed error used as the source of backend failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Comprehensive error type for all planning operations.
#[derive(Error, Debug)]
pub enum PlanningError {
    /// No caller session is active
    #[error("No authenticated user session")]
    Unauthenticated,
    /// The tenant context has no selected unit
    #[error("No unit selected for the current organization")]
    NoUnitSelected,
    /// Referenced entity does not exist
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: String },
    /// The caller is not allowed to perform the mutation
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },
    /// Persistence or blob store failure, message passed through
    #[error("Backend error: {message}")]
    Backend {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Stable classification of a [`PlanningError`], kept in store state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthenticated,
    NoUnitSelected,
    NotFound,
    Forbidden,
    InvalidInput,
    BackendFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::NoUnitSelected => "no_unit_selected",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::BackendFailure => "backend_failure",
        };
        f.write_str(label)
    }
}

/// Builder for creating backend errors with optional context.
pub struct BackendErrorBuilder {
    message: String,
}

impl BackendErrorBuilder {
    /// Create a new backend error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source<E>(self, source: E) -> PlanningError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PlanningError::Backend {
            message: format!("{}: {}", self.message, source),
            source: Some(Box::new(source)),
        }
    }

    /// Build the error without an underlying source.
    pub fn build(self) -> PlanningError {
        PlanningError::Backend {
            message: self.message,
            source: None,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> PlanningError {
        PlanningError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl PlanningError {
    /// Creates a builder for backend errors.
    pub fn backend(message: impl Into<String>) -> BackendErrorBuilder {
        BackendErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Shorthand for a missing entity.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Classifies the error into the store's error taxonomy.
    ///
    /// Everything that is not a caller or context problem is reported as a
    /// backend failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlanningError::Unauthenticated => ErrorKind::Unauthenticated,
            PlanningError::NoUnitSelected => ErrorKind::NoUnitSelected,
            PlanningError::NotFound { .. } => ErrorKind::NotFound,
            PlanningError::Forbidden { .. } => ErrorKind::Forbidden,
            PlanningError::InvalidInput { .. } => ErrorKind::InvalidInput,
            PlanningError::Backend { .. }
            | PlanningError::Serialization { .. }
            | PlanningError::FileSystem { .. }
            | PlanningError::Configuration { .. } => ErrorKind::BackendFailure,
        }
    }
}

/// Specialized extension trait for backend Results.
pub trait BackendResultExt<T> {
    /// Map any error into a backend error with a message.
    fn backend_context(self, message: &str) -> Result<T>;
}

impl<T, E> BackendResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn backend_context(self, message: &str) -> Result<T> {
        self.map_err(|e| PlanningError::backend(message).with_source(e))
    }
}

/// Extension for join handles of blocking tasks.
pub(crate) trait JoinResultExt<T> {
    fn join_context(self) -> Result<T>;
}

impl<T> JoinResultExt<T> for std::result::Result<Result<T>, tokio::task::JoinError> {
    fn join_context(self) -> Result<T> {
        self.map_err(|e| PlanningError::backend("Task join error").with_source(e))?
    }
}

/// Result type alias for planning operations
pub type Result<T> = std::result::Result<T, PlanningError>;
