use std::sync::Arc;

use planning_core::{PlanningStore, PlanningStoreBuilder, SessionResolver};
use tempfile::TempDir;

pub const TENANT: &str = "org";
pub const UNIT: &str = "tower-a";
pub const USER: &str = "ana";

/// Helper function to create a store over a SQLite database and a blob
/// directory inside a temporary directory.
pub async fn create_test_store(temp_dir: &TempDir) -> PlanningStore {
    PlanningStoreBuilder::new()
        .with_database_path(Some(temp_dir.path().join("planning.db")))
        .with_blob_dir(Some(temp_dir.path().join("blobs")))
        .with_resolver(Arc::new(SessionResolver::signed_in(TENANT, UNIT, USER)))
        .build()
        .await
        .expect("Failed to create store")
}
