use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StreamsError;

use super::KeyValueStore;

pub fn default_storage_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".streams")
        .join("storage.json")
}

/// Key-value store persisted as a single JSON object on disk.
///
/// Every mutation rewrites the whole file through a sibling temp file and a
/// rename, so a batched write lands completely or not at all.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, StreamsError> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StreamsError::Storage {
                    path: self.path.clone(),
                    detail: format!("Cannot read file: {e}"),
                })
            }
        };
        if data.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&data).map_err(|e| StreamsError::Storage {
            path: self.path.clone(),
            detail: format!("Invalid JSON: {e}"),
        })
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StreamsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let data = serde_json::to_string_pretty(entries).map_err(|e| StreamsError::Storage {
            path: self.path.clone(),
            detail: format!("Failed to serialize storage: {e}"),
        })?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StreamsError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn multi_set(&self, pairs: &[(&str, &str)]) -> Result<(), StreamsError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        for (key, value) in pairs {
            entries.insert((*key).to_string(), (*value).to_string());
        }
        self.persist(&entries).await
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<(), StreamsError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        let before = entries.len();
        for key in keys {
            entries.remove(*key);
        }
        if entries.len() == before {
            return Ok(());
        }
        self.persist(&entries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_structure() {
        let path = default_storage_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.contains(".streams"));
        assert!(path_str.ends_with("storage.json"));
    }

    #[tokio::test]
    async fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("storage.json"));
        assert!(store.get("accessToken").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn multi_set_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = FileStore::new(&path);
        store
            .multi_set(&[("accessToken", "A1"), ("refreshToken", "R1")])
            .await
            .unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("accessToken").await.unwrap().as_deref(), Some("A1"));
        assert_eq!(reopened.get("refreshToken").await.unwrap().as_deref(), Some("R1"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn multi_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("storage.json"));
        store.set("favoriteTracks", "[]").await.unwrap();
        store.multi_remove(&["favoriteTracks"]).await.unwrap();
        store.multi_remove(&["favoriteTracks"]).await.unwrap();
        assert!(store.get("favoriteTracks").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();
        let store = FileStore::new(&path);
        let err = store.get("accessToken").await.unwrap_err();
        assert_eq!(err.code(), "storage_error");
        assert!(err.to_string().contains("Invalid JSON"));
    }
}
