//! Per-command workflows
//!
//! Each workflow is the same linear shape: connect, subscribe, one or two
//! round trips, disconnect. The connection is always released, whatever the
//! workflow's outcome; see [`with_connection`].

pub mod get_diaries;
pub mod get_pages;
pub mod register;
pub mod signin;

use diaries_client::ws::Credentials;
use diaries_client::{Config, RemoteProcedureCall, Transport, WsTransport};
use diaries_core::Result;
use std::future::Future;
use std::sync::Arc;

/// Connect, subscribe, run the workflow, and disconnect on every exit path
pub(crate) async fn with_connection<F, Fut>(config: &Config, workflow: F) -> Result<()>
where
    F: FnOnce(RemoteProcedureCall) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let credentials = match (&config.broker.username, &config.broker.password) {
        (Some(username), Some(password)) => Some(Credentials {
            username: username.clone(),
            password: password.clone(),
        }),
        _ => None,
    };

    tracing::debug!(url = %config.broker.url, client_id = %config.broker.client_id, "Connecting to broker");
    let transport = Arc::new(WsTransport::connect(&config.broker.url, credentials).await?);

    run_session(transport, &config.broker.client_id, workflow).await
}

/// Subscribe, run the workflow, and disconnect whatever the outcome
///
/// The subscription is part of the guarded region: once the transport is
/// connected, every exit path runs through the disconnect below, including a
/// failed subscribe.
async fn run_session<F, Fut>(
    transport: Arc<dyn Transport>,
    client_id: &str,
    workflow: F,
) -> Result<()>
where
    F: FnOnce(RemoteProcedureCall) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let rpc = RemoteProcedureCall::new(transport.clone(), client_id);

    let outcome = async {
        rpc.subscribe_to_response_topic().await?;
        workflow(rpc).await
    }
    .await;

    if let Err(e) = transport.disconnect().await {
        tracing::warn!(error = %e, "Disconnect failed");
    }
    tracing::debug!(client_id = %client_id, "Disconnected");

    outcome
}
