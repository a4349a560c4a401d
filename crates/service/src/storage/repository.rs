use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

use super::json_doc_store::JsonDocStore;
use crate::errors::ServiceError;

/// Whole-document repository for one entity.
/// Implementations can be file-backed, in-memory, or anything else that can
/// hand back the full document and replace it.
#[async_trait]
pub trait Repository<T>: Send + Sync {
    async fn get(&self) -> Result<T, ServiceError>;
    async fn save(&self, value: T) -> Result<(), ServiceError>;
}

#[async_trait]
impl<T> Repository<T> for JsonDocStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn get(&self) -> Result<T, ServiceError> { JsonDocStore::<T>::get(self).await }
    async fn save(&self, value: T) -> Result<(), ServiceError> { JsonDocStore::<T>::save(self, &value).await }
}

/// In-memory fake for tests and callers that do not want disk.
#[derive(Default)]
pub struct InMemoryRepository<T> {
    inner: RwLock<T>,
}

impl<T> InMemoryRepository<T> {
    pub fn new(initial: T) -> Self { Self { inner: RwLock::new(initial) } }
}

#[async_trait]
impl<T> Repository<T> for InMemoryRepository<T>
where
    T: Clone + Send + Sync,
{
    async fn get(&self) -> Result<T, ServiceError> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, value: T) -> Result<(), ServiceError> {
        *self.inner.write().await = value;
        Ok(())
    }
}
