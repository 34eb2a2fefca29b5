use async_trait::async_trait;

use crate::error::DeliveryError;

/// Queue that carries lookup requests to the enrichment pipeline.
///
/// Delivery is at-least-once; nothing here deduplicates.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Enqueue one payload and return the queue's message id.
    async fn send(&self, payload: &str) -> Result<String, DeliveryError>;
}
