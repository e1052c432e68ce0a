//! Correlation of in-flight requests with their replies
//!
//! Every request published on the shared request topic is answered on the
//! client's private reply topic, and replies may arrive out of send order.
//! The registry maps each outstanding correlation id to a single-use
//! completion handle so that each caller receives exactly its own reply.
//!
//! # Why Oneshot Channels?
//!
//! Each request gets a dedicated oneshot channel because:
//! - Replies arrive asynchronously and out-of-order
//! - The intake task only ever *produces* into the channel and the waiting
//!   caller only *consumes*, so no state is shared beyond the registry map
//! - A second send on a consumed channel is inherently a no-op, which gives
//!   idempotent completion under at-least-once delivery
//!
//! Timeouts are applied at a higher level by racing the receiver against
//! `tokio::time::timeout`; see [`crate::rpc`].

use diaries_core::Response;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};

/// Completion handle for one in-flight request
///
/// Owned exclusively by the caller that sent the request; consumed when the
/// reply is awaited. The handle resolves at most once.
pub struct Token {
    pub(crate) id: String,
    pub(crate) rx: oneshot::Receiver<Response>,
}

impl Token {
    /// Correlation id carried as routing metadata with the request
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Registry of outstanding requests keyed by correlation id
#[derive(Clone)]
pub struct CorrelationRegistry {
    pending: Arc<Mutex<HashMap<String, oneshot::Sender<Response>>>>,
    counter: Arc<Mutex<u64>>,
}

impl CorrelationRegistry {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            counter: Arc::new(Mutex::new(0)),
        }
    }

    /// Allocate a fresh correlation id and register a pending handle for it
    ///
    /// Safe to call concurrently with delivery of replies for other ids.
    pub async fn register(&self) -> Token {
        let id = {
            let mut counter = self.counter.lock().await;
            let id = *counter;
            *counter += 1;
            id.to_string()
        };

        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id.clone(), tx);
        Token { id, rx }
    }

    /// Hand a reply to the waiter registered for `id`
    ///
    /// An unknown id means the request already timed out or this is a
    /// duplicate delivery; the reply is dropped, which is not an error under
    /// at-least-once delivery. A reply whose waiter has gone away is equally
    /// a no-op. Entries are single-use and removed on resolution.
    pub async fn resolve(&self, id: &str, response: Response) {
        match self.pending.lock().await.remove(id) {
            Some(tx) => {
                let _ = tx.send(response);
            }
            None => {
                // Candidate slow-server diagnostic; callers never see this
                tracing::debug!(correlation_id = %id, "Dropping reply with no pending request");
            }
        }
    }

    /// Retire an entry without resolving it, e.g. on timeout
    ///
    /// Any later reply for this id is dropped by [`resolve`](Self::resolve).
    pub async fn discard(&self, id: &str) {
        self.pending.lock().await.remove(id);
    }

    /// Number of requests still awaiting a reply
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}

impl Default for CorrelationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
