//! Wire envelope types for the diaries RPC protocol
//!
//! Two envelopes cross the broker: [`Request`] on the shared request topic
//! and [`Response`] on the client's private reply topic. Both are plain JSON
//! objects; the correlation token that ties a response back to its request is
//! carried as frame routing metadata by the transport, never inside these
//! envelopes.
//!
//! # Request Parameters
//!
//! The service expects request parameters flattened into the same JSON object
//! as the `method` field, rather than nested under a `params` key. The
//! `#[serde(flatten)]` attribute on [`Request::params`] produces exactly that
//! layout while keeping the Rust side a typed map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// RPC request envelope
///
/// Immutable once sent. Built with [`Request::new`] and the [`Request::param`]
/// builder:
///
/// ```rust
/// use diaries_core::Request;
///
/// let request = Request::new("signin")
///     .param("username", "alice")
///     .param("password", "secret");
/// assert_eq!(request.method, "signin");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Name of the remote method to invoke
    pub method: String,
    /// Method parameters, flattened beside `method` on the wire
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl Request {
    /// Create a request for the given method with no parameters
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: Map::new(),
        }
    }

    /// Add a parameter, consuming and returning the request
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Outcome block of a response envelope
///
/// A reply whose status cannot be decoded is treated as a fatal decode error
/// for that reply; all three fields are required on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    /// Whether the request was accepted by the service
    pub ok: bool,
    /// Numeric result code, HTTP-flavoured
    pub code: i32,
    /// Human-readable outcome description
    pub message: String,
}

impl Status {
    pub fn is_ok(&self) -> bool {
        self.ok
    }
}

impl fmt::Display for Status {
    /// Formats as "[code] message" for log lines
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// RPC response envelope
///
/// The payload is kept as an untyped [`Value`] here; its method-specific
/// shape is validated by the decoders in [`crate::codec`] and nowhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Success/failure classification of the request
    pub status: Status,
    /// Method-specific payload, untyped until decoded
    #[serde(default)]
    pub payload: Value,
}

impl Response {
    pub fn is_ok(&self) -> bool {
        self.status.ok
    }
}
