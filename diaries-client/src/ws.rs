//! WebSocket broker adapter
//!
//! Connects the [`Transport`] interface to a broker that speaks a small
//! JSON frame protocol over WebSocket. Each frame is one JSON object tagged
//! by `op`:
//!
//! ```json
//! {"op":"auth","username":"requester","password":"secret"}
//! {"op":"subscribe","topic":"response/requester"}
//! {"op":"publish","topic":"request","corr":"1","replyTo":"response/requester","payload":"{...}"}
//! {"op":"message","topic":"response/requester","corr":"1","payload":"{...}"}
//! ```
//!
//! `publish` and `subscribe` flow client to broker; `message` flows broker to
//! client. A background read loop dispatches `message` frames to the
//! subscriber channel registered for their topic.

use crate::transport::{Delivery, PublishProperties, Transport};
use async_trait::async_trait;
use diaries_core::{Error, Result};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>, Message>;
type WsSource = SplitStream<WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>>;

/// Wire frames exchanged with the broker
///
/// Public so that broker implementations (and the test broker) can speak the
/// same protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum BrokerFrame {
    /// Client credentials, sent once after connecting
    Auth { username: String, password: String },
    /// Ask the broker to deliver messages published on `topic`
    Subscribe { topic: String },
    /// Publish a payload, with correlation metadata for request/reply
    Publish {
        topic: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        corr: Option<String>,
        #[serde(rename = "replyTo", skip_serializing_if = "Option::is_none")]
        reply_to: Option<String>,
        payload: String,
    },
    /// A delivery from the broker on a subscribed topic
    Message {
        topic: String,
        #[serde(default)]
        corr: Option<String>,
        payload: String,
    },
}

/// Broker credentials from the client configuration
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Broker connection over WebSocket
///
/// Cheaply cloneable; all clones share the same connection. The read loop
/// runs on a spawned task for the lifetime of the connection, so deliveries
/// keep flowing while a caller is suspended waiting for a reply.
#[derive(Clone)]
pub struct WsTransport {
    sender: Arc<Mutex<WsSink>>,
    subscriptions: Arc<Mutex<HashMap<String, mpsc::Sender<Delivery>>>>,
}

impl WsTransport {
    /// Connect to the broker, optionally authenticating
    pub async fn connect(url: &str, credentials: Option<Credentials>) -> Result<Self> {
        tracing::debug!(url = %url, "Connecting to broker");
        let (ws_stream, _) = connect_async(url)
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let (sender, receiver) = ws_stream.split();
        let subscriptions: Arc<Mutex<HashMap<String, mpsc::Sender<Delivery>>>> =
            Arc::new(Mutex::new(HashMap::new()));

        let transport = Self {
            sender: Arc::new(Mutex::new(sender)),
            subscriptions: subscriptions.clone(),
        };

        if let Some(creds) = credentials {
            transport
                .send_frame(&BrokerFrame::Auth {
                    username: creds.username,
                    password: creds.password,
                })
                .await?;
        }

        tokio::spawn(Self::receive_loop(receiver, subscriptions));

        tracing::debug!("Connected to broker");
        Ok(transport)
    }

    /// Dispatch incoming frames to the subscriber channel for their topic
    async fn receive_loop(
        mut receiver: WsSource,
        subscriptions: Arc<Mutex<HashMap<String, mpsc::Sender<Delivery>>>>,
    ) {
        while let Some(message) = receiver.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let frame: BrokerFrame = match serde_json::from_str(&text) {
                        Ok(frame) => frame,
                        Err(e) => {
                            tracing::warn!(error = %e, "Dropping unparseable broker frame");
                            continue;
                        }
                    };

                    if let BrokerFrame::Message {
                        topic,
                        corr,
                        payload,
                    } = frame
                    {
                        let subscriber = subscriptions.lock().await.get(&topic).cloned();
                        match subscriber {
                            Some(tx) => {
                                let delivery = Delivery {
                                    topic,
                                    correlation_id: corr,
                                    payload,
                                };
                                if tx.send(delivery).await.is_err() {
                                    tracing::debug!("Subscriber channel closed");
                                }
                            }
                            None => {
                                tracing::debug!(topic = %topic, "Delivery for unsubscribed topic");
                            }
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::debug!("Connection closed by broker");
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "WebSocket error, stopping intake");
                    break;
                }
                _ => {}
            }
        }
        // Dropping the senders wakes any subscriber still reading
        subscriptions.lock().await.clear();
    }

    async fn send_frame(&self, frame: &BrokerFrame) -> Result<()> {
        let text = serde_json::to_string(frame).map_err(|e| Error::Serialization(e.to_string()))?;
        self.sender
            .lock()
            .await
            .send(Message::Text(text))
            .await
            .map_err(|e| Error::Transport(e.to_string()))
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn publish(
        &self,
        topic: &str,
        properties: PublishProperties,
        payload: String,
    ) -> Result<()> {
        self.send_frame(&BrokerFrame::Publish {
            topic: topic.to_string(),
            corr: properties.correlation_id,
            reply_to: properties.reply_topic,
            payload,
        })
        .await
    }

    async fn subscribe(&self, topic: &str) -> Result<mpsc::Receiver<Delivery>> {
        let (tx, rx) = mpsc::channel(64);
        self.subscriptions
            .lock()
            .await
            .insert(topic.to_string(), tx);
        self.send_frame(&BrokerFrame::Subscribe {
            topic: topic.to_string(),
        })
        .await?;
        Ok(rx)
    }

    async fn disconnect(&self) -> Result<()> {
        tracing::debug!("Disconnecting from broker");
        self.sender
            .lock()
            .await
            .send(Message::Close(None))
            .await
            .map_err(|e| Error::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_frame_wire_shape() {
        let frame = BrokerFrame::Publish {
            topic: "request".to_string(),
            corr: Some("7".to_string()),
            reply_to: Some("response/requester".to_string()),
            payload: "{}".to_string(),
        };

        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains("\"op\":\"publish\""));
        assert!(json.contains("\"replyTo\":\"response/requester\""));
        assert!(json.contains("\"corr\":\"7\""));
    }

    #[test]
    fn test_message_frame_without_correlation() {
        let json = r#"{"op":"message","topic":"response/requester","payload":"{}"}"#;
        let frame: BrokerFrame = serde_json::from_str(json).unwrap();
        match frame {
            BrokerFrame::Message { topic, corr, .. } => {
                assert_eq!(topic, "response/requester");
                assert!(corr.is_none());
            }
            other => panic!("expected message frame, got {other:?}"),
        }
    }

    #[test]
    fn test_publish_frame_omits_empty_metadata() {
        let frame = BrokerFrame::Publish {
            topic: "request".to_string(),
            corr: None,
            reply_to: None,
            payload: "{}".to_string(),
        };
        let json = serde_json::to_string(&frame).unwrap();
        assert!(!json.contains("corr"));
        assert!(!json.contains("replyTo"));
    }
}
