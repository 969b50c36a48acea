use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::{StateStore, StoreError, StoreResult};

/// Keeps every key in its own `state_<key>.json` file inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStateStore<T> {
    dir: PathBuf,
    phantom: PhantomData<fn() -> T>,
}

impl<T> FileStateStore<T> {
    pub fn new(dir: PathBuf) -> Self {
        FileStateStore {
            dir,
            phantom: PhantomData,
        }
    }

    /// Creates `dir` (and parents) if it doesn't exist yet.
    pub fn create(dir: PathBuf) -> StoreResult<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn state_path(&self, key: &str) -> StoreResult<PathBuf> {
        let key_is_valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !key_is_valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("state_{}.json", key)))
    }
}

#[async_trait]
impl<T> StateStore<T> for FileStateStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn load(&self, key: &str) -> StoreResult<Option<T>> {
        let path = self.state_path(key)?;
        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                log::error!("Failed state reading from {:?}: {}", path, err);
                return Err(err.into());
            }
        };

        Ok(Some(serde_json::from_slice(&data)?))
    }

    async fn save(&self, key: &str, value: &T) -> StoreResult<()> {
        let path = self.state_path(key)?;
        let data = serde_json::to_vec(value)?;
        let dir = self.dir.clone();

        tokio::task::spawn_blocking(move || -> StoreResult<()> {
            let mut tmp_file = NamedTempFile::new_in(dir)?;
            tmp_file.write_all(&data)?;
            tmp_file.flush()?;
            tmp_file.persist(path)?;
            Ok(())
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    use crate::{StateStore, StoreError};

    use super::FileStateStore;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        value: u32,
    }

    #[tokio::test]
    async fn test_load_missing_state() {
        let tmp_dir = TempDir::new().unwrap();
        let store = FileStateStore::<Counter>::new(tmp_dir.path().to_path_buf());

        assert_eq!(store.load("100500").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_state_survives_store_recreation() {
        let tmp_dir = TempDir::new().unwrap();
        let store = FileStateStore::new(tmp_dir.path().to_path_buf());
        store.save("-1001", &Counter { value: 7 }).await.unwrap();
        drop(store);

        let store = FileStateStore::<Counter>::new(tmp_dir.path().to_path_buf());
        assert_eq!(
            store.load("-1001").await.unwrap(),
            Some(Counter { value: 7 })
        );
    }

    #[tokio::test]
    async fn test_repeated_save_is_idempotent() {
        let tmp_dir = TempDir::new().unwrap();
        let store = FileStateStore::new(tmp_dir.path().to_path_buf());
        let counter = Counter { value: 3 };

        store.save("42", &counter).await.unwrap();
        let first = std::fs::read(tmp_dir.path().join("state_42.json")).unwrap();
        store.save("42", &counter).await.unwrap();
        let second = std::fs::read(tmp_dir.path().join("state_42.json")).unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read_dir(tmp_dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_key() {
        let tmp_dir = TempDir::new().unwrap();
        let store = FileStateStore::<Counter>::new(tmp_dir.path().to_path_buf());

        for key in ["", "../escape", "a/b", "a b"] {
            let err = store.save(key, &Counter { value: 1 }).await.unwrap_err();
            assert!(matches!(err, StoreError::InvalidKey(_)));
            assert!(matches!(
                store.load(key).await.unwrap_err(),
                StoreError::InvalidKey(_)
            ));
        }
    }

    #[tokio::test]
    async fn test_corrupted_state() {
        let tmp_dir = TempDir::new().unwrap();
        std::fs::write(tmp_dir.path().join("state_42.json"), b"{not json").unwrap();
        let store = FileStateStore::<Counter>::new(tmp_dir.path().to_path_buf());

        assert!(matches!(
            store.load("42").await.unwrap_err(),
            StoreError::Serialization(_)
        ));
    }

    #[test]
    fn test_create_makes_directory() {
        let tmp_dir = TempDir::new().unwrap();
        let dir = tmp_dir.path().join("nested").join("states");

        let store = FileStateStore::<Counter>::create(dir.clone()).unwrap();

        assert!(dir.is_dir());
        assert_eq!(store.dir(), dir.as_path());
    }
}
