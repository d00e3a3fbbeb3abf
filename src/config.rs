// src/config.rs

//! Manages bot configuration: loading, environment overrides, and validation.

use crate::core::protocol::event::RANK_MARKERS;
use crate::core::protocol::to_user_id;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;
use url::Url;

/// Top-level bot configuration, parsed from a TOML file.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// The WebSocket endpoint of the chat server (ws:// or wss://).
    pub endpoint: String,
    /// The account name the bot logs in as.
    pub username: String,
    /// The account password. Can be overridden by `BLOWPIPE_PASSWORD`.
    #[serde(default)]
    pub password: Option<String>,
    /// Optional avatar identifier, set right after login.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Public rooms to join after login.
    #[serde(default)]
    pub rooms: Vec<String>,
    /// Additional rooms to join that are not publicly listed.
    #[serde(default)]
    pub private_rooms: Vec<String>,
    /// The leading character that marks a chat line as a command invocation.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: char,
    /// Account names with administrator privileges (normalized on load).
    #[serde(default)]
    pub administrators: Vec<String>,
    /// Delay before re-establishing a dropped connection, in milliseconds.
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
    /// Minimum spacing between two outbound lines, in milliseconds.
    #[serde(default = "default_throttle_interval_ms")]
    pub throttle_interval_ms: u64,
    /// The HTTP endpoint used for the login handshake.
    pub login_url: String,
    /// The auxiliary data store.
    pub store: StoreConfig,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Configuration for the auxiliary HTTP data store.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the store's request endpoint.
    pub url: String,
    /// Shared secret sent with every request.
    #[serde(default)]
    pub secret: String,
}

/// Configuration for the liveness HTTP listener.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthConfig {
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    #[serde(default = "default_health_port")]
    pub port: u16,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            port: default_health_port(),
        }
    }
}

fn default_command_prefix() -> char {
    '.'
}
fn default_reconnect_delay_ms() -> u64 {
    15000
}
fn default_throttle_interval_ms() -> u64 {
    300
}
fn default_health_enabled() -> bool {
    true
}
fn default_health_port() -> u16 {
    5000
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Creates a new `Config` by reading and parsing a TOML file, then
    /// applying environment overrides and validating the result.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML from '{path}'"))?;

        if let Ok(password) = std::env::var("BLOWPIPE_PASSWORD") {
            config.password = Some(password);
        }

        // Administrator identifiers are compared in normalized form everywhere.
        config.administrators = config
            .administrators
            .iter()
            .map(|name| to_user_id(name))
            .collect();

        config.validate()?;
        Ok(config)
    }

    /// Validates the semantic correctness of the configuration.
    pub fn validate(&self) -> Result<()> {
        let endpoint = Url::parse(&self.endpoint)
            .map_err(|e| anyhow!("endpoint is not a valid URL: {e}"))?;
        if !matches!(endpoint.scheme(), "ws" | "wss") {
            return Err(anyhow!(
                "endpoint scheme must be ws or wss, got '{}'",
                endpoint.scheme()
            ));
        }
        if self.username.trim().is_empty() {
            return Err(anyhow!("username must not be empty"));
        }
        if self.password.as_deref().is_none_or(|p| p.is_empty()) {
            return Err(anyhow!(
                "password must be set in the config file or via BLOWPIPE_PASSWORD"
            ));
        }
        if self.command_prefix.is_alphanumeric() || RANK_MARKERS.contains(&self.command_prefix) {
            return Err(anyhow!(
                "command_prefix '{}' collides with chat text or rank markers",
                self.command_prefix
            ));
        }
        if self.reconnect_delay_ms == 0 {
            return Err(anyhow!("reconnect_delay_ms must be greater than zero"));
        }
        if self.throttle_interval_ms == 0 {
            return Err(anyhow!("throttle_interval_ms must be greater than zero"));
        }
        Url::parse(&self.login_url).map_err(|e| anyhow!("login_url is not a valid URL: {e}"))?;
        Url::parse(&self.store.url).map_err(|e| anyhow!("store.url is not a valid URL: {e}"))?;
        Ok(())
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_interval_ms)
    }

    /// All rooms the bot should join, public ones first.
    pub fn all_rooms(&self) -> impl Iterator<Item = &str> {
        self.rooms
            .iter()
            .chain(self.private_rooms.iter())
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Whether the given normalized user id belongs to an administrator.
    pub fn is_administrator(&self, user_id: &str) -> bool {
        self.administrators.iter().any(|a| a == user_id)
    }
}
