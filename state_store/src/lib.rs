pub mod file;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key {0:?} can't be used as a state key")]
    InvalidKey(String),
    #[error("state io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("state (de)serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("state file persisting failed: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error("state background task failed: {0}")]
    Background(#[from] tokio::task::JoinError),
}

/// Per-key state persistence.
///
/// `load` returns `None` for keys that were never saved. `save` replaces the
/// stored value, so saving the same value twice leaves the same result.
#[async_trait]
pub trait StateStore<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    async fn load(&self, key: &str) -> StoreResult<Option<T>>;
    async fn save(&self, key: &str, value: &T) -> StoreResult<()>;
}

#[async_trait]
impl<T, S> StateStore<T> for Arc<S>
where
    T: Send + Sync + 'static,
    S: StateStore<T> + ?Sized,
{
    async fn load(&self, key: &str) -> StoreResult<Option<T>> {
        (**self).load(key).await
    }

    async fn save(&self, key: &str, value: &T) -> StoreResult<()> {
        (**self).save(key, value).await
    }
}
