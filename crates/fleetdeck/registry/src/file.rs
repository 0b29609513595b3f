//! JSON-file registry store.
//!
//! The whole registry is one JSON document. Writes go to a sibling temp
//! file first and are moved into place with a rename, so a crash mid-write
//! never leaves a truncated registry behind.

use async_trait::async_trait;
use fleetdeck_types::InstanceRecord;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::store::RegistryStore;

/// File-backed [`RegistryStore`] implementation.
pub struct FileRegistryStore {
    path: PathBuf,
}

impl FileRegistryStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl RegistryStore for FileRegistryStore {
    async fn load(&self) -> RegistryResult<Vec<InstanceRecord>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "registry file absent; starting empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(RegistryError::Storage(err.to_string())),
        };

        serde_json::from_str(&contents).map_err(|e| RegistryError::Serialization(e.to_string()))
    }

    async fn save(&self, records: &[InstanceRecord]) -> RegistryResult<()> {
        let payload = serde_json::to_vec_pretty(records)
            .map_err(|e| RegistryError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| RegistryError::Storage(e.to_string()))?;
            }
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &payload)
            .await
            .map_err(|e| RegistryError::Storage(e.to_string()))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| RegistryError::Storage(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetdeck_types::RemoteInstanceId;

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRegistryStore::new(dir.path().join("registry.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRegistryStore::new(dir.path().join("nested").join("registry.json"));

        let records = vec![
            InstanceRecord::new("a", RemoteInstanceId::new("gpu-1"), true),
            InstanceRecord::new("b", RemoteInstanceId::new("gpu-2"), false),
        ];
        store.save(&records).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, records);
    }

    #[tokio::test]
    async fn test_save_replaces_whole_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRegistryStore::new(dir.path().join("registry.json"));

        let first = vec![InstanceRecord::new("a", RemoteInstanceId::new("gpu-1"), false)];
        store.save(&first).await.unwrap();
        store.save(&[]).await.unwrap();

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let store = FileRegistryStore::new(&path);
        assert!(matches!(
            store.load().await,
            Err(RegistryError::Serialization(_))
        ));
    }
}
