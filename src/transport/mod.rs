//! Connection seam between the notification client and the network.
//!
//! This module contains:
//! - [`Connector`]: opens one real-time connection for a [`ConnectRequest`]
//! - [`ConnectionHandle`]: exclusive owner of an open connection; dropping or
//!   closing it tears the connection down
//! - [`EventSender`]: generation-stamped event channel back to the client
//! - [`websocket`]: the Socket.IO-over-WebSocket [`WsConnector`]

pub mod websocket;

pub use websocket::WsConnector;

use crate::error::{BridgeError, Result};
use crate::protocol::{ENGINE_IO_VERSION, ServerEvent};
use notify_bridge_config::UserId;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use url::Url;

/// Everything needed to open one connection.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectRequest {
    /// Backend base URL (`wss://host`, `https://host`, ...). Any path on it is ignored.
    pub endpoint: String,
    /// Socket.IO mount path, e.g. `/socket.io/`.
    pub path: String,
    /// Identity forwarded as the `userId` auth parameter.
    pub user_id: UserId,
}

impl ConnectRequest {
    /// Auth object sent with the namespace CONNECT packet.
    pub fn auth(&self) -> serde_json::Value {
        serde_json::json!({ "userId": self.user_id })
    }

    /// WebSocket URL for the Engine.IO handshake.
    pub fn websocket_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| BridgeError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        let scheme = match url.scheme() {
            "wss" | "https" => "wss",
            "ws" | "http" => "ws",
            other => {
                return Err(BridgeError::InvalidEndpoint {
                    endpoint: self.endpoint.clone(),
                    reason: format!("unsupported scheme '{other}'"),
                });
            }
        };
        url.set_scheme(scheme)
            .map_err(|()| BridgeError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                reason: format!("cannot switch scheme to '{scheme}'"),
            })?;

        url.set_path(&self.path);
        url.set_fragment(None);
        url.query_pairs_mut()
            .clear()
            .append_pair("EIO", ENGINE_IO_VERSION)
            .append_pair("transport", "websocket");
        Ok(url)
    }
}

/// A [`ServerEvent`] tagged with the generation of the connection it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionEvent {
    pub generation: u64,
    pub event: ServerEvent,
}

/// Sending half handed to a connector. Every event it sends carries the
/// generation of the connection being opened.
#[derive(Debug, Clone)]
pub struct EventSender {
    generation: u64,
    tx: mpsc::UnboundedSender<ConnectionEvent>,
}

impl EventSender {
    pub fn new(generation: u64, tx: mpsc::UnboundedSender<ConnectionEvent>) -> Self {
        Self { generation, tx }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Queue an event for the client. Returns `false` once the client is gone.
    pub fn send(&self, event: ServerEvent) -> bool {
        self.tx
            .send(ConnectionEvent {
                generation: self.generation,
                event,
            })
            .is_ok()
    }
}

/// Opens real-time connections.
pub trait Connector: Send + Sync {
    /// Start opening a connection. Failures are reported asynchronously as
    /// [`ServerEvent::ConnectError`] through `events`.
    fn open(&self, request: ConnectRequest, events: EventSender) -> ConnectionHandle;
}

/// Exclusive owner of one open (or opening) connection.
///
/// Closing is idempotent; `Drop` closes too, so replacing a handle always
/// tears down the connection it held.
#[derive(Debug)]
pub struct ConnectionHandle {
    generation: u64,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ConnectionHandle {
    pub fn new(generation: u64, shutdown: oneshot::Sender<()>) -> Self {
        Self {
            generation,
            shutdown: Some(shutdown),
            task: None,
        }
    }

    /// Attach the background task driving the connection.
    pub fn with_task(mut self, task: JoinHandle<()>) -> Self {
        self.task = Some(task);
        self
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Tear the connection down.
    pub fn close(mut self) {
        self.signal_shutdown();
    }

    fn signal_shutdown(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            // The task may already have exited after a server-side close.
            let _ = tx.send(());
            log::debug!("Closed real-time connection (generation {})", self.generation);
        }
        // The task finishes its close handshake on its own; it is detached here.
        self.task.take();
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        self.signal_shutdown();
    }
}
