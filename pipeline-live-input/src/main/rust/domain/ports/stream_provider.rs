use async_trait::async_trait;

use crate::domain::errors::Result;
use crate::domain::value_objects::ProvisionedInput;

/// Port for the external live-streaming API
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Provision a new live input
    async fn create_live_input(&self) -> Result<ProvisionedInput>;

    /// Delete a live input by provider id
    async fn delete_live_input(&self, id: &str) -> Result<()>;
}
