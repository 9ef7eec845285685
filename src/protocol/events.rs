//! Server events the notification client reacts to.

use super::socket_io::{PacketKind, SocketPacket};
use serde::Deserialize;
use serde_json::Value;

/// Name of the server-pushed notification event.
pub const NOTIFICATION_EVENT: &str = "notification";

/// Body of a `notification` event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotificationPayload {
    pub message: String,
    #[serde(default)]
    pub report_url: Option<String>,
}

impl NotificationPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            report_url: None,
        }
    }

    pub fn with_report_url(mut self, url: impl Into<String>) -> Self {
        self.report_url = Some(url.into());
        self
    }

    /// A report was attached. An empty URL counts as no report.
    pub fn has_report(&self) -> bool {
        self.report_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Lifecycle and data events surfaced by a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// The namespace CONNECT was acknowledged.
    Connected,
    /// A `notification` event arrived.
    Notification(NotificationPayload),
    /// An established connection was lost or closed by the server.
    Disconnected { reason: String },
    /// The connection could not be established.
    ConnectError { message: String },
}

/// Map a decoded Socket.IO packet to a [`ServerEvent`].
///
/// Returns `None` for packets the client ignores: acks, unknown event names,
/// and notification events whose body does not decode.
pub fn event_from_packet(packet: SocketPacket) -> Option<ServerEvent> {
    match packet.kind {
        PacketKind::Connect => Some(ServerEvent::Connected),
        PacketKind::Disconnect => Some(ServerEvent::Disconnected {
            reason: "io server disconnect".to_string(),
        }),
        PacketKind::ConnectError => Some(ServerEvent::ConnectError {
            message: connect_error_message(packet.data.as_ref()),
        }),
        PacketKind::Event => event_from_data(packet.data),
        PacketKind::Ack | PacketKind::BinaryEvent | PacketKind::BinaryAck => {
            log::debug!("Ignoring {:?} packet", packet.kind);
            None
        }
    }
}

fn connect_error_message(data: Option<&Value>) -> String {
    match data {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(map)) => map
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("connection refused")
            .to_string(),
        _ => "connection refused".to_string(),
    }
}

fn event_from_data(data: Option<Value>) -> Option<ServerEvent> {
    let Some(Value::Array(mut args)) = data else {
        log::warn!("Ignoring event packet without an argument array");
        return None;
    };
    if args.is_empty() {
        log::warn!("Ignoring event packet without an event name");
        return None;
    }
    let name = match args.remove(0) {
        Value::String(name) => name,
        other => {
            log::warn!("Ignoring event packet with non-string name: {}", other);
            return None;
        }
    };

    if name != NOTIFICATION_EVENT {
        log::debug!("Ignoring unhandled event '{}'", name);
        return None;
    }

    let body = args.into_iter().next().unwrap_or(Value::Null);
    match serde_json::from_value::<NotificationPayload>(body) {
        Ok(payload) => Some(ServerEvent::Notification(payload)),
        Err(e) => {
            log::warn!("Dropping malformed notification payload: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(text: &str) -> Option<ServerEvent> {
        event_from_packet(SocketPacket::decode(text).unwrap())
    }

    #[test]
    fn test_connect_ack_is_connected() {
        assert_eq!(decode(r#"0{"sid":"x"}"#), Some(ServerEvent::Connected));
    }

    #[test]
    fn test_notification_with_report() {
        let event = decode(
            r#"2["notification",{"message":"Report ready","report_url":"/reports/7.pdf"}]"#,
        );
        let expected = NotificationPayload::new("Report ready").with_report_url("/reports/7.pdf");
        assert_eq!(event, Some(ServerEvent::Notification(expected)));
    }

    #[test]
    fn test_notification_without_report() {
        match decode(r#"2["notification",{"message":"Status changed"}]"#) {
            Some(ServerEvent::Notification(p)) => {
                assert_eq!(p.message, "Status changed");
                assert!(!p.has_report());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_empty_report_url_is_no_report() {
        let payload = NotificationPayload::new("x").with_report_url("");
        assert!(!payload.has_report());
    }

    #[test]
    fn test_notification_missing_message_is_dropped() {
        assert_eq!(decode(r#"2["notification",{"report_url":"/r"}]"#), None);
        assert_eq!(decode(r#"2["notification"]"#), None);
    }

    #[test]
    fn test_other_events_are_ignored() {
        assert_eq!(decode(r#"2["typing",{"user":1}]"#), None);
        assert_eq!(decode(r#"2[]"#), None);
        assert_eq!(decode(r#"2{"not":"an array"}"#), None);
    }

    #[test]
    fn test_connect_error_message() {
        assert_eq!(
            decode(r#"4{"message":"Not authorized"}"#),
            Some(ServerEvent::ConnectError {
                message: "Not authorized".to_string()
            })
        );
        assert_eq!(
            decode(r#"4"bad auth""#),
            Some(ServerEvent::ConnectError {
                message: "bad auth".to_string()
            })
        );
    }

    #[test]
    fn test_server_disconnect() {
        assert!(matches!(
            decode("1"),
            Some(ServerEvent::Disconnected { .. })
        ));
    }
}
