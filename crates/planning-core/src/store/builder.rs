//! Builder for creating and configuring [`PlanningStore`] instances.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;

use super::PlanningStore;
use crate::{
    backend::{BlobStore, DocumentStore, FsBlobStore, SqliteDocumentStore},
    context::TenantResolver,
    error::{PlanningError, Result},
};

const XDG_PREFIX: &str = "condo-planning";

/// Builder for [`PlanningStore`].
///
/// Backends default to a SQLite database and a blob directory under the XDG
/// data home: `$XDG_DATA_HOME/condo-planning/planning.db` and
/// `$XDG_DATA_HOME/condo-planning/blobs`. A tenant resolver must always be
/// supplied.
#[derive(Default)]
pub struct PlanningStoreBuilder {
    database_path: Option<PathBuf>,
    blob_dir: Option<PathBuf>,
    records: Option<Arc<dyn DocumentStore>>,
    blobs: Option<Arc<dyn BlobStore>>,
    resolver: Option<Arc<dyn TenantResolver>>,
}

impl PlanningStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets a custom directory for uploaded files.
    pub fn with_blob_dir<P: AsRef<Path>>(mut self, dir: Option<P>) -> Self {
        if let Some(dir) = dir {
            self.blob_dir = Some(dir.as_ref().to_path_buf());
        }
        self
    }

    /// Uses `store` for records instead of the SQLite default.
    pub fn with_document_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.records = Some(store);
        self
    }

    /// Uses `store` for file contents instead of the blob directory.
    pub fn with_blob_store(mut self, store: Arc<dyn BlobStore>) -> Self {
        self.blobs = Some(store);
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn TenantResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Builds the store.
    ///
    /// # Errors
    ///
    /// Returns `PlanningError::Configuration` if no resolver was given or the
    /// XDG directories cannot be created, `PlanningError::FileSystem` or
    /// `PlanningError::Backend` if the database cannot be opened.
    pub async fn build(self) -> Result<PlanningStore> {
        let resolver = self.resolver.ok_or_else(|| PlanningError::Configuration {
            message: "A tenant resolver is required".to_string(),
        })?;

        let records: Arc<dyn DocumentStore> = match self.records {
            Some(records) => records,
            None => {
                let db_path = match self.database_path {
                    Some(path) => path,
                    None => Self::default_database_path()?,
                };
                debug!("using database {}", db_path.display());
                Arc::new(SqliteDocumentStore::open(db_path).await?)
            }
        };

        let blobs: Arc<dyn BlobStore> = match self.blobs {
            Some(blobs) => blobs,
            None => {
                let blob_dir = match self.blob_dir {
                    Some(dir) => dir,
                    None => Self::default_blob_dir()?,
                };
                debug!("using blob directory {}", blob_dir.display());
                Arc::new(FsBlobStore::new(blob_dir))
            }
        };

        Ok(PlanningStore::new(records, blobs, resolver))
    }

    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix(XDG_PREFIX)
            .place_data_file("planning.db")
            .map_err(|e| PlanningError::Configuration {
                message: format!("Cannot place database file: {e}"),
            })
    }

    fn default_blob_dir() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix(XDG_PREFIX)
            .create_data_directory("blobs")
            .map_err(|e| PlanningError::Configuration {
                message: format!("Cannot create blob directory: {e}"),
            })
    }
}
