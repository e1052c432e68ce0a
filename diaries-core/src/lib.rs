//! Core types for the diaries RPC protocol
//!
//! This crate defines the wire envelopes exchanged with the diaries service
//! over the message broker, the payload codec that converts between typed
//! domain records and the broker's untyped JSON payloads, and the error
//! taxonomy shared by every crate in the workspace.
//!
//! # Wire Format
//!
//! Requests are a single JSON object with a `method` field and the method's
//! parameters flattened alongside it:
//!
//! ```json
//! { "method": "signin", "username": "alice", "password": "secret" }
//! ```
//!
//! Responses carry a status block and a method-specific payload:
//!
//! ```json
//! { "status": { "ok": true, "code": 200, "message": "ok" }, "payload": [...] }
//! ```
//!
//! The payload's concrete shape is only validated at decode time, never
//! assumed earlier; see the [`codec`] module.

pub mod codec;
pub mod error;
pub mod model;
pub mod types;

pub use error::{Error, Result};
pub use model::{Diary, Page, Registration, SigninReply};
pub use types::{Request, Response, Status};
