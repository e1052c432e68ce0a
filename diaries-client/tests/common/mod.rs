//! Common test utilities for diaries-client integration tests
//!
//! Provides a lightweight mock broker speaking the WebSocket frame protocol,
//! so round trips can be exercised without a real diaries service.

use diaries_client::BrokerFrame;
use diaries_core::{Request, Response, Status};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

/// Mock broker for requestor testing
///
/// Accepts connections, decodes published request envelopes and hands them to
/// a handler. The handler returns zero or more responses per request: zero to
/// provoke a timeout, one for the normal case, two to simulate duplicate
/// delivery. Every response is sent back as a `message` frame on the
/// request's reply topic with its correlation id echoed.
pub struct MockBroker {
    addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
}

impl MockBroker {
    /// Start a broker whose request handling is scripted by `handler`
    pub async fn start<F, Fut>(handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Vec<Response>> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let handler = Arc::new(handler);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    accept_result = listener.accept() => {
                        let Ok((stream, _)) = accept_result else { break };
                        let handler = handler.clone();

                        tokio::spawn(async move {
                            let Ok(ws_stream) = accept_async(stream).await else { return };
                            let (sink, mut source) = ws_stream.split();
                            let sink = Arc::new(Mutex::new(sink));

                            while let Some(Ok(Message::Text(text))) = source.next().await {
                                let Ok(frame) = serde_json::from_str::<BrokerFrame>(&text) else {
                                    continue;
                                };

                                if let BrokerFrame::Publish { corr, reply_to, payload, .. } = frame {
                                    let Ok(request) = serde_json::from_str::<Request>(&payload) else {
                                        continue;
                                    };
                                    let handler = handler.clone();
                                    let sink = sink.clone();

                                    // Replies go out from their own task so a slow
                                    // handler does not delay later requests
                                    tokio::spawn(async move {
                                        let topic = reply_to.unwrap_or_default();
                                        for response in handler(request).await {
                                            let reply = BrokerFrame::Message {
                                                topic: topic.clone(),
                                                corr: corr.clone(),
                                                payload: serde_json::to_string(&response).unwrap(),
                                            };
                                            let text = serde_json::to_string(&reply).unwrap();
                                            let _ = sink.lock().await.send(Message::Text(text)).await;
                                        }
                                    });
                                }
                            }
                        });
                    }
                }
            }
        });

        Self { addr, shutdown_tx }
    }

    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Build an accepting response with the given payload
pub fn accepted(payload: Value) -> Response {
    Response {
        status: Status {
            ok: true,
            code: 200,
            message: "ok".to_string(),
        },
        payload,
    }
}

/// Build a rejecting response
pub fn rejected(code: i32, message: &str) -> Response {
    Response {
        status: Status {
            ok: false,
            code,
            message: message.to_string(),
        },
        payload: Value::Null,
    }
}
