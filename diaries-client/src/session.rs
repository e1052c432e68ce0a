//! Persisted client session state
//!
//! The access/refresh token record written by a successful sign-in and read
//! back before any authorized call. Immutable for the duration of one
//! command invocation; commands pass it explicitly rather than keeping it as
//! ambient shared state.

use diaries_core::{Error, Result, SigninReply};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Access/refresh token pair stored as a local JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub access_token: String,
    pub refresh_token: String,
}

impl State {
    /// Load the state file, failing if it is absent, unreadable or corrupt
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Io(format!("{}: {e}", path.as_ref().display())))?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::Io(format!("{}: {e}", path.as_ref().display())))
    }

    /// Persist the state file, replacing any previous record
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path.as_ref(), json)
            .map_err(|e| Error::Io(format!("{}: {e}", path.as_ref().display())))?;
        Ok(())
    }

    /// Pretty-printed form for log lines
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }
}

impl From<SigninReply> for State {
    fn from(reply: SigninReply) -> Self {
        Self {
            access_token: reply.access_token,
            refresh_token: reply.refresh_token,
        }
    }
}
