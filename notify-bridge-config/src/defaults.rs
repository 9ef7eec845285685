//! Default value functions for configuration.
//!
//! Used as `#[serde(default = "crate::defaults::...")]` attributes on
//! `Config` fields.

// ── Primitive helpers ──────────────────────────────────────────────────────

pub fn bool_true() -> bool {
    true
}

// ── Connection ─────────────────────────────────────────────────────────────

/// Backend real-time endpoint. Deployments override this in config.yaml or
/// with `NOTIFY_BRIDGE_ENDPOINT`.
pub fn endpoint() -> String {
    "wss://ai-credit-backend.onrender.com".to_string()
}

pub fn socket_path() -> String {
    "/socket.io/".to_string()
}

pub fn connect_timeout_secs() -> u64 {
    20
}

// ── Presentation ───────────────────────────────────────────────────────────

pub fn presenter() -> crate::types::PresenterKind {
    crate::types::PresenterKind::Desktop
}

pub fn log_level() -> crate::types::LogLevel {
    crate::types::LogLevel::Info
}
