//! Socket.IO v5 packets, carried inside Engine.IO `message` packets.
//!
//! Text form: `<type>[/<namespace>,][<ack id>][<json>]`, for example
//! `40{"userId":1}` or `42/admin,7["notification",{...}]`.

use super::ProtocolError;
use serde_json::Value;

/// Namespace every packet targets unless it names another one.
pub const DEFAULT_NAMESPACE: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketKind {
    Connect,
    Disconnect,
    Event,
    Ack,
    ConnectError,
    BinaryEvent,
    BinaryAck,
}

impl PacketKind {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '0' => PacketKind::Connect,
            '1' => PacketKind::Disconnect,
            '2' => PacketKind::Event,
            '3' => PacketKind::Ack,
            '4' => PacketKind::ConnectError,
            '5' => PacketKind::BinaryEvent,
            '6' => PacketKind::BinaryAck,
            _ => return None,
        })
    }

    fn as_char(self) -> char {
        match self {
            PacketKind::Connect => '0',
            PacketKind::Disconnect => '1',
            PacketKind::Event => '2',
            PacketKind::Ack => '3',
            PacketKind::ConnectError => '4',
            PacketKind::BinaryEvent => '5',
            PacketKind::BinaryAck => '6',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SocketPacket {
    pub kind: PacketKind,
    pub namespace: String,
    pub ack_id: Option<u64>,
    pub data: Option<Value>,
}

impl SocketPacket {
    /// CONNECT to the default namespace with an auth object.
    pub fn connect(auth: Value) -> Self {
        Self {
            kind: PacketKind::Connect,
            namespace: DEFAULT_NAMESPACE.to_string(),
            ack_id: None,
            data: Some(auth),
        }
    }

    /// DISCONNECT from the default namespace.
    pub fn disconnect() -> Self {
        Self {
            kind: PacketKind::Disconnect,
            namespace: DEFAULT_NAMESPACE.to_string(),
            ack_id: None,
            data: None,
        }
    }

    /// Decode the payload of an Engine.IO `message` packet.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let mut chars = text.chars();
        let type_char = chars.next().ok_or(ProtocolError::Empty)?;
        let kind = PacketKind::from_char(type_char).ok_or(ProtocolError::UnknownType {
            layer: "socket.io",
            found: type_char,
        })?;
        if matches!(kind, PacketKind::BinaryEvent | PacketKind::BinaryAck) {
            return Err(ProtocolError::Unsupported(
                "binary attachments are not supported".to_string(),
            ));
        }

        let mut rest = chars.as_str();

        let namespace = if rest.starts_with('/') {
            match rest.find(',') {
                Some(idx) => {
                    let ns = &rest[..idx];
                    rest = &rest[idx + 1..];
                    ns.to_string()
                }
                None => {
                    let ns = rest.to_string();
                    rest = "";
                    ns
                }
            }
        } else {
            DEFAULT_NAMESPACE.to_string()
        };

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let ack_id = if digits > 0 {
            let id = rest[..digits]
                .parse::<u64>()
                .map_err(|e| ProtocolError::Unsupported(format!("ack id out of range: {e}")))?;
            rest = &rest[digits..];
            Some(id)
        } else {
            None
        };

        let data = if rest.is_empty() {
            None
        } else {
            Some(serde_json::from_str(rest)?)
        };

        Ok(Self {
            kind,
            namespace,
            ack_id,
            data,
        })
    }

    pub fn encode(&self) -> String {
        let mut out = String::new();
        out.push(self.kind.as_char());
        if self.namespace != DEFAULT_NAMESPACE {
            out.push_str(&self.namespace);
            out.push(',');
        }
        if let Some(id) = self.ack_id {
            out.push_str(&id.to_string());
        }
        if let Some(data) = &self.data {
            out.push_str(&data.to_string());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_connect_with_auth() {
        let packet = SocketPacket::connect(json!({ "userId": 17 }));
        assert_eq!(packet.encode(), r#"0{"userId":17}"#);
    }

    #[test]
    fn test_encode_disconnect() {
        assert_eq!(SocketPacket::disconnect().encode(), "1");
    }

    #[test]
    fn test_decode_connect_ack() {
        let packet = SocketPacket::decode(r#"0{"sid":"abc"}"#).unwrap();
        assert_eq!(packet.kind, PacketKind::Connect);
        assert_eq!(packet.namespace, "/");
        assert_eq!(packet.data, Some(json!({ "sid": "abc" })));
    }

    #[test]
    fn test_decode_event_with_namespace_and_ack() {
        let packet =
            SocketPacket::decode(r#"2/admin,12["notification",{"message":"hi"}]"#).unwrap();
        assert_eq!(packet.kind, PacketKind::Event);
        assert_eq!(packet.namespace, "/admin");
        assert_eq!(packet.ack_id, Some(12));
        assert_eq!(
            packet.data,
            Some(json!(["notification", { "message": "hi" }]))
        );
        assert_eq!(
            packet.encode(),
            r#"2/admin,12["notification",{"message":"hi"}]"#
        );
    }

    #[test]
    fn test_decode_namespace_without_payload() {
        let packet = SocketPacket::decode("1/admin,").unwrap();
        assert_eq!(packet.kind, PacketKind::Disconnect);
        assert_eq!(packet.namespace, "/admin");
        assert!(packet.data.is_none());
    }

    #[test]
    fn test_decode_rejects_binary() {
        assert!(matches!(
            SocketPacket::decode(r#"51-["upload",{"_placeholder":true,"num":0}]"#),
            Err(ProtocolError::Unsupported(_))
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        assert!(matches!(
            SocketPacket::decode("x"),
            Err(ProtocolError::UnknownType {
                layer: "socket.io",
                ..
            })
        ));
    }
}
