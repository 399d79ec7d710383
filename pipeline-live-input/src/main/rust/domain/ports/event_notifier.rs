use async_trait::async_trait;

use crate::domain::errors::Result;
use crate::domain::value_objects::StreamEvent;

/// Port for delivering stream state changes to a third party
#[async_trait]
pub trait EventNotifier: Send + Sync {
    async fn deliver(&self, event: &StreamEvent) -> Result<()>;
}
