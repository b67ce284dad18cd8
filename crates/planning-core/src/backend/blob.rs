//! Blob store implementations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use tokio::{fs, sync::RwLock};

use super::{BlobStore, StoragePath};
use crate::error::{PlanningError, Result};

const MEMORY_SCHEME: &str = "memory://";
const FILE_SCHEME: &str = "file://";

/// A stored blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Blob store keeping contents in memory. URLs use the `memory://` scheme.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<BTreeMap<String, Blob>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The blob behind a retrieval URL or path.
    pub async fn get(&self, url_or_path: &str) -> Option<Blob> {
        let key = url_or_path.strip_prefix(MEMORY_SCHEME).unwrap_or(url_or_path);
        self.blobs.read().await.get(key).cloned()
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, path: &StoragePath, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        self.blobs.write().await.insert(
            path.to_string(),
            Blob {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("{MEMORY_SCHEME}{path}"))
    }

    async fn delete(&self, url_or_path: &str) -> Result<()> {
        let key = url_or_path.strip_prefix(MEMORY_SCHEME).unwrap_or(url_or_path);
        self.blobs
            .write()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| PlanningError::not_found("Blob", key))
    }
}

/// Blob store writing files below a root directory. URLs use the `file://`
/// scheme with the absolute file path.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a retrieval URL or a storage path to a file below the root.
    ///
    /// # Errors
    ///
    /// Returns `PlanningError::InvalidInput` for paths escaping the root.
    pub fn resolve(&self, url_or_path: &str) -> Result<PathBuf> {
        let resolved = match url_or_path.strip_prefix(FILE_SCHEME) {
            Some(absolute) => PathBuf::from(absolute),
            None => self.root.join(url_or_path.trim_start_matches('/')),
        };

        let escapes = resolved
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir));
        if escapes || !resolved.starts_with(&self.root) {
            return Err(PlanningError::invalid_input("path")
                .with_reason(format!("'{url_or_path}' is outside the blob directory")));
        }
        Ok(resolved)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, path: &StoragePath, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let file = self.resolve(path.as_str())?;
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PlanningError::FileSystem {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        fs::write(&file, bytes)
            .await
            .map_err(|e| PlanningError::FileSystem {
                path: file.clone(),
                source: e,
            })?;
        debug!("stored blob {} ({content_type})", file.display());
        Ok(format!("{FILE_SCHEME}{}", file.display()))
    }

    async fn delete(&self, url_or_path: &str) -> Result<()> {
        let file = self.resolve(url_or_path)?;
        fs::remove_file(&file)
            .await
            .map_err(|e| PlanningError::FileSystem {
                path: file.clone(),
                source: e,
            })?;
        debug!("deleted blob {}", file.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_memory_put_and_delete() {
        let store = MemoryBlobStore::new();
        let url = store
            .put(&StoragePath::new(["a", "b.pdf"]), vec![1, 2, 3], "application/pdf")
            .await
            .unwrap();
        assert_eq!(url, "memory://a/b.pdf");
        assert_eq!(store.get(&url).await.unwrap().bytes, vec![1, 2, 3]);

        store.delete(&url).await.unwrap();
        assert!(store.is_empty().await);
        assert!(store.delete(&url).await.is_err());
    }

    #[tokio::test]
    async fn test_fs_put_and_delete_by_url() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(temp_dir.path());
        let url = store
            .put(&StoragePath::new(["tenant", "t", "minutes.txt"]), b"hello".to_vec(), "text/plain")
            .await
            .unwrap();

        let file = store.resolve(&url).unwrap();
        assert_eq!(std::fs::read(&file).unwrap(), b"hello");

        store.delete(&url).await.unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn test_fs_rejects_escaping_paths() {
        let store = FsBlobStore::new("/tmp/blobs");
        assert!(store.resolve("../etc/passwd").is_err());
        assert!(store.resolve("file:///etc/passwd").is_err());
    }
}
