//! Socket.IO client connection over a plain WebSocket transport.
//!
//! One background task per connection:
//! 1. WebSocket handshake and Engine.IO `open`, bounded by the connect timeout
//! 2. namespace CONNECT carrying the `userId` auth object
//! 3. read loop answering pings and forwarding mapped [`ServerEvent`]s
//!
//! The task never reconnects. Losing the transport before the CONNECT ack is
//! reported as `ConnectError`, afterwards as `Disconnected`. A shutdown from
//! the owning [`ConnectionHandle`] sends a DISCONNECT and a close frame and
//! reports nothing.

use super::{ConnectRequest, ConnectionHandle, Connector, EventSender};
use crate::error::{BridgeError, Result};
use crate::protocol::socket_io::DEFAULT_NAMESPACE;
use crate::protocol::{EnginePacket, OpenInfo, ServerEvent, SocketPacket, event_from_packet};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{MaybeTlsStream, connect_async};

type WebSocketStream = tokio_tungstenite::WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Default bound on the handshake, matching the Socket.IO client default.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(20);

/// [`Connector`] that speaks Socket.IO v5 over tokio-tungstenite.
#[derive(Debug, Clone)]
pub struct WsConnector {
    connect_timeout: Duration,
}

impl WsConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for WsConnector {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

impl Connector for WsConnector {
    fn open(&self, request: ConnectRequest, events: EventSender) -> ConnectionHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let generation = events.generation();
        let task = tokio::spawn(run_connection(
            request,
            events,
            shutdown_rx,
            self.connect_timeout,
        ));
        ConnectionHandle::new(generation, shutdown_tx).with_task(task)
    }
}

async fn run_connection(
    request: ConnectRequest,
    events: EventSender,
    mut shutdown_rx: oneshot::Receiver<()>,
    connect_timeout: Duration,
) {
    let established = tokio::select! {
        biased;
        _ = &mut shutdown_rx => {
            log::debug!("Connection (generation {}) closed during handshake", events.generation());
            return;
        }
        result = establish(&request, connect_timeout) => result,
    };

    match established {
        Ok((ws, open)) => {
            log::info!(
                "Real-time transport open (sid {}, ping interval {}ms)",
                open.sid,
                open.ping_interval
            );
            read_loop(ws, &open, &events, shutdown_rx).await;
        }
        Err(e) => {
            events.send(ServerEvent::ConnectError {
                message: e.to_string(),
            });
        }
    }
}

/// WebSocket handshake, Engine.IO open, and namespace CONNECT.
async fn establish(
    request: &ConnectRequest,
    connect_timeout: Duration,
) -> Result<(WebSocketStream, OpenInfo)> {
    let url = request.websocket_url()?;
    log::info!("Connecting to {}{}", url.host_str().unwrap_or(""), url.path());

    let (mut ws, _response) = tokio::time::timeout(connect_timeout, connect_async(url.as_str()))
        .await
        .map_err(|_| BridgeError::Timeout("waiting for the WebSocket handshake"))??;

    let open = tokio::time::timeout(connect_timeout, read_open(&mut ws))
        .await
        .map_err(|_| BridgeError::Timeout("waiting for the Engine.IO open packet"))??;

    let connect = SocketPacket::connect(request.auth());
    ws.send(engine_message(&connect)).await?;

    Ok((ws, open))
}

async fn read_open(ws: &mut WebSocketStream) -> Result<OpenInfo> {
    while let Some(frame) = ws.next().await {
        match frame? {
            Message::Text(text) => match EnginePacket::decode(&text)? {
                EnginePacket::Open(info) => return Ok(info),
                other => log::debug!("Ignoring {:?} before Engine.IO open", other),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }
    Err(BridgeError::Protocol(crate::protocol::ProtocolError::Unsupported(
        "connection closed before the Engine.IO open packet".to_string(),
    )))
}

async fn read_loop(
    ws: WebSocketStream,
    open: &OpenInfo,
    events: &EventSender,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let (mut sink, mut stream) = ws.split();
    let liveness = open.liveness_window();
    let mut deadline = Instant::now() + liveness;
    let mut connected = false;

    loop {
        let frame = tokio::select! {
            biased;

            // Highest priority: the owning handle was closed or dropped.
            _ = &mut shutdown_rx => {
                let _ = sink.send(engine_message(&SocketPacket::disconnect())).await;
                let _ = sink.close().await;
                log::debug!("Real-time connection (generation {}) shut down by client", events.generation());
                return;
            }

            _ = tokio::time::sleep_until(deadline) => {
                report_lost(events, connected, "ping timeout");
                return;
            }

            frame = stream.next() => frame,
        };
        deadline = Instant::now() + liveness;

        let text = match frame {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Close(_))) | None => {
                report_lost(events, connected, "transport close");
                return;
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                report_lost(events, connected, &format!("transport error: {e}"));
                return;
            }
        };

        let packet = match EnginePacket::decode(&text) {
            Ok(packet) => packet,
            Err(e) => {
                log::warn!("Ignoring undecodable frame: {}", e);
                continue;
            }
        };

        match packet {
            EnginePacket::Ping(data) => {
                if let Err(e) = sink.send(Message::Text(EnginePacket::Pong(data).encode().into())).await
                {
                    report_lost(events, connected, &format!("transport error: {e}"));
                    return;
                }
            }
            EnginePacket::Message(body) => {
                let socket_packet = match SocketPacket::decode(&body) {
                    Ok(p) => p,
                    Err(e) => {
                        log::warn!("Ignoring undecodable Socket.IO packet: {}", e);
                        continue;
                    }
                };
                if socket_packet.namespace != DEFAULT_NAMESPACE {
                    log::debug!("Ignoring packet for namespace {}", socket_packet.namespace);
                    continue;
                }
                let Some(event) = event_from_packet(socket_packet) else {
                    continue;
                };
                let terminal = matches!(
                    event,
                    ServerEvent::Disconnected { .. } | ServerEvent::ConnectError { .. }
                );
                if event == ServerEvent::Connected {
                    connected = true;
                }
                if !events.send(event) || terminal {
                    let _ = sink.close().await;
                    return;
                }
            }
            EnginePacket::Close => {
                report_lost(events, connected, "transport close");
                return;
            }
            EnginePacket::Open(_)
            | EnginePacket::Pong(_)
            | EnginePacket::Upgrade
            | EnginePacket::Noop => {}
        }
    }
}

fn engine_message(packet: &SocketPacket) -> Message {
    Message::Text(EnginePacket::Message(packet.encode()).encode().into())
}

fn report_lost(events: &EventSender, connected: bool, reason: &str) {
    let event = if connected {
        ServerEvent::Disconnected {
            reason: reason.to_string(),
        }
    } else {
        ServerEvent::ConnectError {
            message: reason.to_string(),
        }
    };
    events.send(event);
}
