//! Client configuration
//!
//! Every command takes `-c/--config <path>` naming a TOML file:
//!
//! ```toml
//! [broker]
//! url = "ws://localhost:8080"
//! username = "requester"
//! password = "secret"
//!
//! [state]
//! path = "/home/alice/.diaries-state.json"
//! ```
//!
//! The `[state]` section is optional and defaults to a file in the working
//! directory.

use diaries_core::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CLIENT_ID: &str = "requester";
const DEFAULT_STATE_FILE: &str = "diaries-state.json";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub broker: BrokerConfig,
    #[serde(default)]
    pub state: StateConfig,
}

#[derive(Debug, Deserialize)]
pub struct BrokerConfig {
    /// Broker WebSocket URL
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Client identifier; the reply topic is derived from it
    #[serde(default = "default_client_id")]
    pub client_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct StateConfig {
    pub path: Option<PathBuf>,
}

fn default_client_id() -> String {
    DEFAULT_CLIENT_ID.to_string()
}

impl Config {
    pub fn from_toml(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::from_toml(&contents)
    }

    /// Where the session token record lives
    pub fn state_path(&self) -> PathBuf {
        self.state
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE))
    }
}
