//! Engine.IO v4 packets over a WebSocket transport.
//!
//! Each WebSocket text frame carries exactly one packet: a single type digit
//! followed by an optional payload.

use super::ProtocolError;
use serde::Deserialize;
use std::time::Duration;

/// Handshake data sent by the server in the `open` packet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenInfo {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Milliseconds between server pings.
    pub ping_interval: u64,
    /// Milliseconds the server waits for a pong.
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

impl OpenInfo {
    /// Silence after which the connection is considered dead: one ping
    /// interval plus the ping timeout.
    pub fn liveness_window(&self) -> Duration {
        Duration::from_millis(self.ping_interval.saturating_add(self.ping_timeout))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnginePacket {
    Open(OpenInfo),
    Close,
    Ping(String),
    Pong(String),
    Message(String),
    Upgrade,
    Noop,
}

impl EnginePacket {
    /// Decode one WebSocket text frame.
    pub fn decode(frame: &str) -> Result<Self, ProtocolError> {
        let mut chars = frame.chars();
        let kind = chars.next().ok_or(ProtocolError::Empty)?;
        let body = chars.as_str();

        Ok(match kind {
            '0' => EnginePacket::Open(serde_json::from_str(body)?),
            '1' => EnginePacket::Close,
            '2' => EnginePacket::Ping(body.to_string()),
            '3' => EnginePacket::Pong(body.to_string()),
            '4' => EnginePacket::Message(body.to_string()),
            '5' => EnginePacket::Upgrade,
            '6' => EnginePacket::Noop,
            found => {
                return Err(ProtocolError::UnknownType {
                    layer: "engine.io",
                    found,
                });
            }
        })
    }

    /// Encode a client-originated packet. The server never receives `open`,
    /// so that variant encodes to its bare type digit.
    pub fn encode(&self) -> String {
        match self {
            EnginePacket::Open(_) => "0".to_string(),
            EnginePacket::Close => "1".to_string(),
            EnginePacket::Ping(data) => format!("2{data}"),
            EnginePacket::Pong(data) => format!("3{data}"),
            EnginePacket::Message(data) => format!("4{data}"),
            EnginePacket::Upgrade => "5".to_string(),
            EnginePacket::Noop => "6".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_open() {
        let packet = EnginePacket::decode(
            r#"0{"sid":"lv_VI97HAXpY6yYWAAAC","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#,
        )
        .unwrap();
        let info = match packet {
            EnginePacket::Open(info) => info,
            other => panic!("expected open packet, got {other:?}"),
        };
        assert_eq!(info.sid, "lv_VI97HAXpY6yYWAAAC");
        assert_eq!(info.max_payload, Some(1_000_000));
        assert_eq!(info.liveness_window(), Duration::from_millis(45_000));
    }

    #[test]
    fn test_decode_ping_and_message() {
        assert_eq!(
            EnginePacket::decode("2").unwrap(),
            EnginePacket::Ping(String::new())
        );
        assert_eq!(
            EnginePacket::decode("42[\"x\"]").unwrap(),
            EnginePacket::Message("2[\"x\"]".to_string())
        );
    }

    #[test]
    fn test_pong_echoes_probe_data() {
        assert_eq!(EnginePacket::Pong("probe".into()).encode(), "3probe");
        assert_eq!(EnginePacket::Pong(String::new()).encode(), "3");
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        let err = EnginePacket::decode("9").unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::UnknownType {
                layer: "engine.io",
                found: '9'
            }
        ));
    }

    #[test]
    fn test_decode_rejects_empty_and_bad_open() {
        assert!(matches!(EnginePacket::decode(""), Err(ProtocolError::Empty)));
        assert!(matches!(
            EnginePacket::decode("0{not json"),
            Err(ProtocolError::Json(_))
        ));
    }
}
