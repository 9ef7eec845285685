//! Socket.IO client wire format.
//!
//! The backend speaks Socket.IO v5 over Engine.IO v4 on a plain WebSocket
//! transport. This module contains:
//! - [`engine_io`]: transport-level packets (open, ping/pong, message, ...)
//! - [`socket_io`]: namespace-level packets carried inside Engine.IO messages
//! - [`events`]: mapping of decoded packets to the [`ServerEvent`]s the
//!   notification client reacts to

pub mod engine_io;
pub mod events;
pub mod socket_io;

pub use engine_io::{EnginePacket, OpenInfo};
pub use events::{NOTIFICATION_EVENT, NotificationPayload, ServerEvent, event_from_packet};
pub use socket_io::{PacketKind, SocketPacket};

use thiserror::Error;

/// Engine.IO protocol revision sent in the handshake query.
pub const ENGINE_IO_VERSION: &str = "4";

/// Errors produced while decoding Engine.IO / Socket.IO frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A zero-length frame.
    #[error("empty packet")]
    Empty,

    /// The leading type digit is not a known packet type.
    #[error("unknown {layer} packet type '{found}'")]
    UnknownType {
        /// `"engine.io"` or `"socket.io"`.
        layer: &'static str,
        /// The offending character.
        found: char,
    },

    /// A JSON body failed to parse.
    #[error("malformed packet payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A well-formed packet this client does not handle.
    #[error("unsupported packet: {0}")]
    Unsupported(String),
}
