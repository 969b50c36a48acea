use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{StateStore, StoreResult};

#[derive(Debug)]
pub struct MemoryStateStore<T> {
    values: RwLock<HashMap<String, T>>,
}

impl<T> Default for MemoryStateStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemoryStateStore<T> {
    pub fn new() -> Self {
        MemoryStateStore {
            values: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }
}

#[async_trait]
impl<T> StateStore<T> for MemoryStateStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn load(&self, key: &str) -> StoreResult<Option<T>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &T) -> StoreResult<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.clone());
        Ok(())
    }
}
