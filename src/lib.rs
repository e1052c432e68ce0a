//! diaries — RPC client family for the diaries service
//!
//! This is the convenience crate that re-exports the workspace members. Use
//! it if you want a single dependency providing the envelope types, the
//! payload codec and the broker requestor.
//!
//! # Architecture
//!
//! - **diaries-core**: wire envelopes, payload codec, domain records, errors
//! - **diaries-client**: correlation registry, RPC requestor, broker
//!   transport, domain operations, configuration and session state
//! - **diaries-cli**: the `diaries` binary with one subcommand per workflow
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use diaries::client::{requests, Reply, RemoteProcedureCall, WsTransport};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> diaries::core::Result<()> {
//!     let transport = WsTransport::connect("ws://localhost:8080", None).await?;
//!     let rpc = RemoteProcedureCall::new(Arc::new(transport), "requester");
//!     rpc.subscribe_to_response_topic().await?;
//!
//!     match requests::get_diaries(&rpc, "access-token").await? {
//!         Reply::Accepted(diaries) => println!("{} diaries", diaries.len()),
//!         Reply::Rejected(status) => println!("rejected: {status}"),
//!     }
//!     Ok(())
//! }
//! ```

pub use diaries_client as client;
pub use diaries_core as core;

// Convenience re-exports for the most common types
pub use diaries_client::{RemoteProcedureCall, WsTransport};
pub use diaries_core::{Error, Request, Response, Result, Status};
