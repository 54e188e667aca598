//! Arena server configuration.

use crate::ledger::Amount;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Configuration for the arena server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// Stake used when a join creates the match.
    #[serde(default = "default_stake")]
    default_stake: Amount,

    /// SQLite ledger database; in-memory ledger when absent.
    #[serde(default)]
    ledger_path: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_stake() -> Amount {
    20
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_stake: default_stake(),
            ledger_path: None,
        }
    }
}

impl ArenaConfig {
    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        debug!("Loading config from file");
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid TOML for this
    /// configuration.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("malformed TOML: {}", e)))?;
        info!(host = %config.host, port = config.port, "Config loaded");
        Ok(config)
    }

    /// Applies command-line and `PORT` environment overrides.
    ///
    /// Explicit flags win over `PORT`, which wins over the file.
    #[instrument(skip(self))]
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(env_port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            debug!(port = env_port, "PORT override");
            self.port = env_port;
        }
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Returns the `host:port` bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Rejected arena configuration, tagged with the code location that
/// rejected it.
#[derive(Debug, Clone, Display, Error)]
#[display("Invalid arena config: {} ({}:{})", message, file, line)]
pub struct ConfigError {
    /// What was wrong with the configuration.
    pub message: String,
    /// Line that raised the error.
    pub line: u32,
    /// Source file that raised the error.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates an error located at the caller.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
