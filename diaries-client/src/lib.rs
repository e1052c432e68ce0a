//! RPC requestor for the diaries service
//!
//! This crate implements the client side of the diaries request/response
//! protocol: a correlation registry that matches replies to in-flight
//! requests, a [`RemoteProcedureCall`] requestor that publishes request
//! envelopes and hands out completion handles, a broker transport adapter,
//! and the per-method domain operations used by the command-line family.
//!
//! # Round Trip
//!
//! 1. **Connect**: open the broker transport
//! 2. **Subscribe**: `subscribe_to_response_topic` establishes the private
//!    reply channel and spawns the reply intake task
//! 3. **Send**: publish a request envelope on the shared request topic,
//!    keeping a completion handle
//! 4. **Wait**: suspend on the handle until the correlated reply arrives or
//!    the timeout elapses
//! 5. **Decode**: convert the untyped payload into typed domain records
//! 6. **Disconnect**: release the connection on every exit path
//!
//! Replies may arrive in any order; each in-flight request is resolved
//! independently by its correlation id.

pub mod config;
pub mod correlation;
pub mod requests;
pub mod rpc;
pub mod session;
pub mod transport;
pub mod ws;

pub use config::{BrokerConfig, Config};
pub use correlation::{CorrelationRegistry, Token};
pub use requests::{round_trip, Reply, DEFAULT_TIMEOUT};
pub use rpc::{RemoteProcedureCall, REQUEST_TOPIC};
pub use session::State;
pub use transport::{Delivery, PublishProperties, Transport};
pub use ws::{BrokerFrame, Credentials, WsTransport};
