// src/core/errors.rs

//! Defines the primary error type for the entire application.

use thiserror::Error;

/// The main error enum, representing all possible failures within the bot.
#[derive(Error, Debug)]
pub enum BlowpipeError {
    #[error("Transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Authentication rejected: {0}")]
    AuthenticationFailed(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl BlowpipeError {
    /// Whether this error must terminate the process instead of scheduling
    /// a reconnect. Wrong credentials cannot self-heal.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BlowpipeError::AuthenticationFailed(_) | BlowpipeError::Config(_)
        )
    }
}
