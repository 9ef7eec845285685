//! Typed error types for notify-bridge.
//!
//! Callers at the crate boundary can match on specific variants instead of
//! relying on opaque `anyhow` strings. Runtime failures inside the event loop
//! (presenters, speech, refresh commands) never surface here; they are logged
//! and swallowed.

use crate::protocol::ProtocolError;
use notify_bridge_config::ConfigError;
use thiserror::Error;

/// Top-level error type for the notification bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The configured endpoint cannot be turned into a WebSocket or HTTP URL.
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// The endpoint as configured.
        endpoint: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The WebSocket handshake or stream failed.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] Box<tokio_tungstenite::tungstenite::Error>),

    /// The server sent something the Engine.IO / Socket.IO codec rejected.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A handshake step did not complete in time.
    #[error("Timed out {0}")]
    Timeout(&'static str),

    /// An HTTP request (health probe) failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Configuration or session state could not be read.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A refresh command string could not be parsed.
    #[error("Invalid command '{command}': {reason}")]
    InvalidCommand {
        /// The command as configured.
        command: String,
        /// Parser message.
        reason: String,
    },
}

impl From<tokio_tungstenite::tungstenite::Error> for BridgeError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        BridgeError::WebSocket(Box::new(e))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BridgeError>;
