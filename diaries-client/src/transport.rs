//! Broker transport interface
//!
//! The underlying publish/subscribe transport is an external collaborator:
//! the requestor only needs to publish bytes to a topic, receive deliveries
//! from a subscribed topic, and disconnect. Delivery is assumed reliable,
//! ordered per-topic and at-least-once, which is why duplicate replies must
//! be tolerated further up.

use async_trait::async_trait;
use diaries_core::Result;
use tokio::sync::mpsc;

/// One message delivered on a subscribed topic
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Topic the message was published on
    pub topic: String,
    /// Correlation id carried as routing metadata, if the publisher set one
    pub correlation_id: Option<String>,
    /// Serialized envelope
    pub payload: String,
}

/// Routing metadata attached to a published message
///
/// The correlation id and reply topic travel alongside the payload, not
/// inside it; the responder echoes the correlation id on its reply.
#[derive(Debug, Clone, Default)]
pub struct PublishProperties {
    pub correlation_id: Option<String>,
    pub reply_topic: Option<String>,
}

/// Publish/subscribe broker connection
///
/// Implementations are shared behind an `Arc` between the foreground command
/// flow and the reply intake task.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Publish a payload on a topic with the given routing metadata
    async fn publish(
        &self,
        topic: &str,
        properties: PublishProperties,
        payload: String,
    ) -> Result<()>;

    /// Subscribe to a topic, receiving its deliveries on the returned channel
    async fn subscribe(&self, topic: &str) -> Result<mpsc::Receiver<Delivery>>;

    /// Close the broker connection
    async fn disconnect(&self) -> Result<()>;
}
