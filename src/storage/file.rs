//! File-backed key-value store
//!
//! Each key lives in `<dir>/<key>.json`. Writes land in a sibling temporary
//! file first and are renamed over the target, so a reader sees either the
//! old value or the new one.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

use super::KeyValueStore;
use crate::errors::{StoreError, StoreResult};

#[derive(Debug, Clone)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Reject anything that could escape `base_dir`
    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        if key.is_empty()
            || key == "."
            || key.contains("..")
            || key.contains('/')
            || key.contains('\\')
            || key.contains('\0')
        {
            return Err(StoreError::invalid_key(key));
        }
        Ok(self.base_dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }

    async fn put(&self, key: &str, value: String) -> StoreResult<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| StoreError::io(key, e))?;

        let tmp_path = self
            .base_dir
            .join(format!(".{key}.{}.tmp", uuid::Uuid::new_v4().simple()));
        tokio::fs::write(&tmp_path, value.as_bytes())
            .await
            .map_err(|e| StoreError::io(key, e))?;

        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(StoreError::io(key, e));
        }

        debug!("Stored {} bytes under '{}' at {:?}", value.len(), key, path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("emoji-data").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        store
            .put("emoji-data", r#"{"1f600":[]}"#.to_string())
            .await
            .unwrap();

        assert_eq!(
            store.get("emoji-data").await.unwrap().as_deref(),
            Some(r#"{"1f600":[]}"#)
        );
        assert!(dir.path().join("nested/emoji-data.json").exists());
    }

    #[tokio::test]
    async fn test_put_leaves_no_temporary_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.put("emoji-data", "{}".to_string()).await.unwrap();
        store.put("emoji-data", "{}".to_string()).await.unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("emoji-data.json")]);
    }

    #[rstest]
    #[case("")]
    #[case("..")]
    #[case("../etc/passwd")]
    #[case("a/b")]
    #[case("a\\b")]
    #[tokio::test]
    async fn test_invalid_keys_are_rejected(#[case] key: &str) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(matches!(
            store.get(key).await,
            Err(StoreError::InvalidKey { .. })
        ));
        assert!(matches!(
            store.put(key, "x".to_string()).await,
            Err(StoreError::InvalidKey { .. })
        ));
    }
}
