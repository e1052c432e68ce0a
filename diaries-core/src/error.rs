//! Error taxonomy for the diaries RPC client
//!
//! One `Error` enum covers the whole family of failure modes:
//!
//! - **Transport errors**: connect/publish/disconnect failures, fatal for the
//!   running command.
//! - **Usage errors**: `NotReady`, raised when a request is attempted before
//!   the reply topic subscription exists.
//! - **Round-trip errors**: `Timeout` and `ChannelClosed`, local to a single
//!   in-flight request; the correlation registry entry is always retired.
//! - **Decode errors**: `UnexpectedType` and `MalformedPayload`, raised when a
//!   reply payload does not match the shape its method promises. These fail
//!   the current decode only.
//! - **Workflow errors**: `Status` for replies a workflow treats as fatal, and
//!   `NoDiariesFound` for the composite list-pages precondition.

use crate::types::Status;
use thiserror::Error;

/// Result type used throughout the diaries crates
pub type Result<T> = std::result::Result<T, Error>;

/// All error conditions raised by the diaries client family
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Broker connect, publish or disconnect failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request attempted before subscribing to the response topic
    ///
    /// This is a usage error: `subscribe_to_response_topic` must be called
    /// once after connecting and before any send.
    #[error("not subscribed to the response topic")]
    NotReady,

    /// No matching reply arrived within the configured bound
    ///
    /// The completion handle is retired when this is raised; a late reply
    /// for the same correlation id is dropped by the registry.
    #[error("request timeout")]
    Timeout,

    /// Reply decoded but the service rejected the request
    ///
    /// Only surfaced as an `Error` where a workflow defines a non-ok status
    /// as fatal; list-style workflows report the status and exit normally.
    #[error("request rejected: [{code}] {message}")]
    Status {
        /// Numeric result code from the reply status block
        code: i32,
        /// Service-provided failure description
        message: String,
    },

    /// Reply payload had a different JSON type than the method promises
    #[error("unexpected type: expected {expected}, got {actual}")]
    UnexpectedType {
        /// JSON type the decoder required
        expected: &'static str,
        /// JSON type actually found in the payload
        actual: &'static str,
    },

    /// Reply payload was the right JSON type but not decodable
    ///
    /// Raised for example when the signin reply's nested JSON document does
    /// not parse, or a record mapping is missing a required field.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The diary collection was empty where at least one diary is required
    #[error("no diaries found")]
    NoDiariesFound,

    /// Failed to serialize a request envelope
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The in-flight request's completion channel was dropped unresolved
    #[error("response channel closed")]
    ChannelClosed,

    /// Local file failure: unreadable, unwritable or corrupt (session state)
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration file missing or malformed
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build a fatal error from a rejecting reply status
    pub fn rejected(status: &Status) -> Self {
        Error::Status {
            code: status.code,
            message: status.message.clone(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_carries_status_fields() {
        let status = Status {
            ok: false,
            code: 401,
            message: "bad credentials".to_string(),
        };

        match Error::rejected(&status) {
            Error::Status { code, message } => {
                assert_eq!(code, 401);
                assert_eq!(message, "bad credentials");
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[test]
    fn test_unexpected_type_names_actual_type() {
        let error = Error::UnexpectedType {
            expected: "array",
            actual: "string",
        };
        let display = error.to_string();
        assert!(display.contains("array"));
        assert!(display.contains("string"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "state file missing");
        let error: Error = io.into();
        match error {
            Error::Io(msg) => assert!(msg.contains("state file missing")),
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
