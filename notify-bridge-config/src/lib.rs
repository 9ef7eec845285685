//! Configuration system for the notify-bridge notification client.
//!
//! This crate provides configuration loading, saving, and default values
//! for the bridge. It includes:
//!
//! - The YAML-backed [`Config`] with endpoint, presentation and speech settings
//! - The persisted [`SessionStore`] holding the signed-in user's identity
//! - Typed [`ConfigError`] variants for callers that want to match on failures

pub mod config;
pub mod defaults;
pub mod error;
pub mod session;
mod types;

// Re-export main types for convenience
pub use config::{Config, ENDPOINT_ENV_VAR};
pub use error::ConfigError;
pub use session::{SessionStore, SessionUser, UserId};
pub use types::{LogLevel, PresenterKind};
