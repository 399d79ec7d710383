use async_trait::async_trait;

use crate::domain::errors::Result;

/// Port for the shared key-value store. No transactional guarantees.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn put(&self, key: &str, value: String) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}
