//! In-memory document store.
//!
//! Thread-safe, backed by `RwLock`-protected maps. Used by tests and by
//! embedders that do not need durability.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{query, DocumentStore, Filter, OrderBy, Record, StoragePath, StoredRecord};
use crate::error::{PlanningError, Result};

type Collections = BTreeMap<StoragePath, BTreeMap<String, Record>>;

/// Document store keeping every collection in memory.
///
/// Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records stored at or below `prefix`.
    pub async fn count_under(&self, prefix: &StoragePath) -> usize {
        self.collections
            .read()
            .await
            .iter()
            .filter(|(collection, _)| collection.starts_with(prefix))
            .map(|(_, records)| records.len())
            .sum()
    }

    /// Removes every record.
    pub async fn clear(&self) {
        self.collections.write().await.clear();
    }
}

fn split(path: &StoragePath) -> Result<(StoragePath, String)> {
    let collection = path.parent().ok_or_else(|| {
        PlanningError::invalid_input("path").with_reason(format!("'{path}' is not a record path"))
    })?;
    Ok((collection, path.last_segment().to_string()))
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn query(
        &self,
        collection: &StoragePath,
        filters: &[Filter],
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<StoredRecord>> {
        let collections = self.collections.read().await;
        let records = collections
            .get(collection)
            .into_iter()
            .flat_map(|records| records.iter())
            .map(|(id, record)| StoredRecord {
                id: id.clone(),
                record: record.clone(),
            });
        let result = query::apply(records, filters, order_by);
        debug!("query {collection}: {} record(s)", result.len());
        Ok(result)
    }

    async fn get(&self, path: &StoragePath) -> Result<Option<Record>> {
        let (collection, id) = split(path)?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|records| records.get(&id))
            .cloned())
    }

    async fn create(&self, collection: &StoragePath, record: Record) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();
        self.collections
            .write()
            .await
            .entry(collection.clone())
            .or_default()
            .insert(id.clone(), record);
        debug!("created {collection}/{id}");
        Ok(id)
    }

    async fn put(&self, path: &StoragePath, record: Record) -> Result<()> {
        let (collection, id) = split(path)?;
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .insert(id, record);
        Ok(())
    }

    async fn patch(&self, path: &StoragePath, partial: Record) -> Result<()> {
        let (collection, id) = split(path)?;
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(&collection)
            .and_then(|records| records.get_mut(&id))
            .ok_or_else(|| PlanningError::not_found("Record", path.as_str()))?;
        existing.extend(partial);
        Ok(())
    }

    async fn delete(&self, path: &StoragePath) -> Result<()> {
        let (collection, id) = split(path)?;
        let mut collections = self.collections.write().await;
        if let Some(records) = collections.get_mut(&collection) {
            records.remove(&id);
            if records.is_empty() {
                collections.remove(&collection);
            }
        }
        debug!("deleted {path}");
        Ok(())
    }
}
