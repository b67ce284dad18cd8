//! SQLite-backed document store.
//!
//! Records are JSON text rows keyed by `(collection, id)`. Each call opens a
//! connection on a blocking worker thread; filtering and ordering are applied
//! with the same rules as the in-memory store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use jiff::Timestamp;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::task;
use uuid::Uuid;

use super::{query, DocumentStore, Filter, OrderBy, Record, StoragePath, StoredRecord};
use crate::{
    error::{BackendResultExt, JoinResultExt, PlanningError, Result},
    models::record::format_timestamp,
};

const SELECT_COLLECTION_SQL: &str = "SELECT id, data FROM records WHERE collection = ?1";
const SELECT_RECORD_SQL: &str = "SELECT data FROM records WHERE collection = ?1 AND id = ?2";
const INSERT_RECORD_SQL: &str = "INSERT INTO records (collection, id, data, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)";
const UPSERT_RECORD_SQL: &str = "INSERT INTO records (collection, id, data, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4) ON CONFLICT (collection, id) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at";
const UPDATE_RECORD_SQL: &str =
    "UPDATE records SET data = ?1, updated_at = ?2 WHERE collection = ?3 AND id = ?4";
const DELETE_RECORD_SQL: &str = "DELETE FROM records WHERE collection = ?1 AND id = ?2";
const COUNT_UNDER_SQL: &str = "SELECT COUNT(*) FROM records WHERE collection = ?1 OR substr(collection, 1, length(?1) + 1) = ?1 || '/'";

/// Connection wrapper that initializes the schema on open.
struct Database {
    connection: Connection,
}

impl Database {
    fn open(path: &Path) -> Result<Self> {
        let connection =
            Connection::open(path).backend_context("Failed to open database connection")?;
        connection
            .execute_batch(include_str!("../../assets/schema.sql"))
            .backend_context("Failed to initialize database schema")?;
        Ok(Self { connection })
    }

    fn query_collection(&self, collection: &str) -> Result<Vec<StoredRecord>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_COLLECTION_SQL)
            .backend_context("Failed to prepare query")?;

        let rows = stmt
            .query_map(params![collection], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .backend_context("Failed to query records")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .backend_context("Failed to read records")?;

        rows.into_iter()
            .map(|(id, data)| {
                Ok(StoredRecord {
                    id,
                    record: serde_json::from_str(&data)?,
                })
            })
            .collect()
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Record>> {
        let data: Option<String> = self
            .connection
            .query_row(SELECT_RECORD_SQL, params![collection, id], |row| row.get(0))
            .optional()
            .backend_context("Failed to query record")?;

        data.map(|d| serde_json::from_str(&d).map_err(PlanningError::from))
            .transpose()
    }

    fn insert(&self, collection: &str, id: &str, record: &Record) -> Result<()> {
        let data = serde_json::to_string(record)?;
        self.connection
            .execute(
                INSERT_RECORD_SQL,
                params![collection, id, data, format_timestamp(&Timestamp::now())],
            )
            .backend_context("Failed to insert record")?;
        Ok(())
    }

    fn upsert(&self, collection: &str, id: &str, record: &Record) -> Result<()> {
        let data = serde_json::to_string(record)?;
        self.connection
            .execute(
                UPSERT_RECORD_SQL,
                params![collection, id, data, format_timestamp(&Timestamp::now())],
            )
            .backend_context("Failed to write record")?;
        Ok(())
    }

    fn patch(&mut self, collection: &str, id: &str, partial: Record) -> Result<bool> {
        let tx = self
            .connection
            .transaction()
            .backend_context("Failed to begin transaction")?;

        let data: Option<String> = tx
            .query_row(SELECT_RECORD_SQL, params![collection, id], |row| row.get(0))
            .optional()
            .backend_context("Failed to query record")?;
        let Some(data) = data else {
            return Ok(false);
        };

        let mut record: Record = serde_json::from_str(&data)?;
        record.extend(partial);
        tx.execute(
            UPDATE_RECORD_SQL,
            params![
                serde_json::to_string(&record)?,
                format_timestamp(&Timestamp::now()),
                collection,
                id
            ],
        )
        .backend_context("Failed to update record")?;

        tx.commit().backend_context("Failed to commit transaction")?;
        Ok(true)
    }

    fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.connection
            .execute(DELETE_RECORD_SQL, params![collection, id])
            .backend_context("Failed to delete record")?;
        Ok(())
    }

    fn count_under(&self, prefix: &str) -> Result<usize> {
        let count: i64 = self
            .connection
            .query_row(COUNT_UNDER_SQL, params![prefix], |row| row.get(0))
            .backend_context("Failed to count records")?;
        Ok(count as usize)
    }
}

fn split(path: &StoragePath) -> Result<(String, String)> {
    let collection = path.parent().ok_or_else(|| {
        PlanningError::invalid_input("path").with_reason(format!("'{path}' is not a record path"))
    })?;
    Ok((collection.to_string(), path.last_segment().to_string()))
}

/// Document store persisted in a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    db_path: PathBuf,
}

impl SqliteDocumentStore {
    /// Opens (and creates if needed) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns `PlanningError::FileSystem` if the parent directory cannot be
    /// created and `PlanningError::Backend` if schema initialization fails.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PlanningError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let init_path = db_path.clone();
        task::spawn_blocking(move || Database::open(&init_path).map(|_| ()))
            .await
            .join_context()?;

        Ok(Self { db_path })
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Number of records stored at or below `prefix`.
    pub async fn count_under(&self, prefix: &StoragePath) -> Result<usize> {
        let prefix = prefix.to_string();
        self.with_database(move |db| db.count_under(&prefix)).await
    }

    async fn with_database<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::open(&db_path)?;
            f(&mut db)
        })
        .await
        .join_context()
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn query(
        &self,
        collection: &StoragePath,
        filters: &[Filter],
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<StoredRecord>> {
        let name = collection.to_string();
        let records = self
            .with_database(move |db| db.query_collection(&name))
            .await?;
        let result = query::apply(records, filters, order_by);
        debug!("query {collection}: {} record(s)", result.len());
        Ok(result)
    }

    async fn get(&self, path: &StoragePath) -> Result<Option<Record>> {
        let (collection, id) = split(path)?;
        self.with_database(move |db| db.get(&collection, &id)).await
    }

    async fn create(&self, collection: &StoragePath, record: Record) -> Result<String> {
        let name = collection.to_string();
        let id = Uuid::new_v4().simple().to_string();
        let new_id = id.clone();
        self.with_database(move |db| db.insert(&name, &new_id, &record))
            .await?;
        debug!("created {collection}/{id}");
        Ok(id)
    }

    async fn put(&self, path: &StoragePath, record: Record) -> Result<()> {
        let (collection, id) = split(path)?;
        self.with_database(move |db| db.upsert(&collection, &id, &record))
            .await
    }

    async fn patch(&self, path: &StoragePath, partial: Record) -> Result<()> {
        let (collection, id) = split(path)?;
        let found = self
            .with_database(move |db| db.patch(&collection, &id, partial))
            .await?;
        if found {
            Ok(())
        } else {
            Err(PlanningError::not_found("Record", path.as_str()))
        }
    }

    async fn delete(&self, path: &StoragePath) -> Result<()> {
        let (collection, id) = split(path)?;
        self.with_database(move |db| db.delete(&collection, &id))
            .await?;
        debug!("deleted {path}");
        Ok(())
    }
}
