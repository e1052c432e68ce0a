//! The request/response round trip used by every command
//!
//! [`RemoteProcedureCall`] owns the correlation registry and the reply topic.
//! `send` is non-blocking: it registers a completion handle, publishes the
//! encoded envelope with the correlation id and reply topic as routing
//! metadata, and returns the handle immediately. `wait_for_response` suspends
//! only the calling flow; the spawned intake task keeps resolving replies for
//! this and any other outstanding request in the meantime.

use crate::correlation::{CorrelationRegistry, Token};
use crate::transport::{Delivery, PublishProperties, Transport};
use diaries_core::{codec, Error, Request, Response, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Well-known topic all requests are published on
pub const REQUEST_TOPIC: &str = "request";

/// RPC requestor bound to one broker connection
pub struct RemoteProcedureCall {
    transport: Arc<dyn Transport>,
    registry: CorrelationRegistry,
    reply_topic: String,
    subscribed: AtomicBool,
}

impl RemoteProcedureCall {
    /// Create a requestor whose replies arrive on `response/<client_id>`
    pub fn new(transport: Arc<dyn Transport>, client_id: &str) -> Self {
        Self {
            transport,
            registry: CorrelationRegistry::new(),
            reply_topic: format!("response/{client_id}"),
            subscribed: AtomicBool::new(false),
        }
    }

    /// The private topic this client's replies are published on
    pub fn reply_topic(&self) -> &str {
        &self.reply_topic
    }

    /// Establish the reply channel and start the intake task
    ///
    /// Must be called once after connecting and before any [`send`](Self::send).
    pub async fn subscribe_to_response_topic(&self) -> Result<()> {
        let mut deliveries = self.transport.subscribe(&self.reply_topic).await?;
        let registry = self.registry.clone();

        tokio::spawn(async move {
            while let Some(delivery) = deliveries.recv().await {
                Self::handle_delivery(&registry, delivery).await;
            }
            tracing::debug!("Reply intake stopped");
        });

        self.subscribed.store(true, Ordering::SeqCst);
        tracing::debug!(topic = %self.reply_topic, "Subscribed to response topic");
        Ok(())
    }

    /// Decode one delivery and resolve its pending request
    ///
    /// Malformed deliveries are logged and dropped; the registry entry stays
    /// pending until its waiter times out, so registry invariants hold.
    async fn handle_delivery(registry: &CorrelationRegistry, delivery: Delivery) {
        let Some(id) = delivery.correlation_id else {
            tracing::warn!("Dropping reply without correlation id");
            return;
        };

        match codec::decode_response(&delivery.payload) {
            Ok(response) => registry.resolve(&id, response).await,
            Err(e) => {
                tracing::warn!(correlation_id = %id, error = %e, "Dropping undecodable reply");
            }
        }
    }

    /// Publish a request and return its completion handle without waiting
    ///
    /// Errors with [`Error::NotReady`] if the response topic subscription has
    /// not been established yet.
    pub async fn send(&self, request: &Request) -> Result<Token> {
        if !self.subscribed.load(Ordering::SeqCst) {
            return Err(Error::NotReady);
        }

        let token = self.registry.register().await;
        let payload = codec::encode(request)?;
        let properties = PublishProperties {
            correlation_id: Some(token.id().to_string()),
            reply_topic: Some(self.reply_topic.clone()),
        };

        tracing::debug!(method = %request.method, correlation_id = %token.id(), "Sending request");
        if let Err(e) = self
            .transport
            .publish(REQUEST_TOPIC, properties, payload)
            .await
        {
            // Request and handle are created together and destroyed together
            self.registry.discard(token.id()).await;
            return Err(e);
        }

        Ok(token)
    }

    /// Suspend until the correlated reply arrives or the timeout elapses
    ///
    /// On timeout the handle is retired from the registry and any late reply
    /// for its id is dropped by the intake path.
    pub async fn wait_for_response(&self, token: Token, timeout: Duration) -> Result<Response> {
        let Token { id, rx } = token;

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(Error::ChannelClosed),
            Err(_) => {
                self.registry.discard(&id).await;
                tracing::debug!(correlation_id = %id, "Request timed out");
                Err(Error::Timeout)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn registry(&self) -> &CorrelationRegistry {
        &self.registry
    }
}
