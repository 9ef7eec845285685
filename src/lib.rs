//! Desktop bridge for backend real-time notifications.
//!
//! A [`client::NotificationClient`] owns one Socket.IO connection to the
//! backend, turns pushed `notification` events into transient desktop
//! notifications (optionally spoken aloud), and asks the hosting page to
//! refresh its application lists.
//!
//! # Threading
//!
//! The client is driven by a single event loop ([`client::NotificationClient::run_until`]).
//! The connection task and the notification removal timers run on tokio;
//! the notifications container uses a `parking_lot::Mutex` because it is
//! touched from both timer tasks and the event loop and never held across
//! an `.await`.

/// Application version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod cli;
pub mod client;
pub mod error;
pub mod http;
pub mod logging;
pub mod notification;
pub mod page;
pub mod platform;
pub mod protocol;
pub mod refresh;
pub mod speech;
pub mod transport;

pub use client::{NotificationClient, SessionSource};
pub use error::{BridgeError, Result};
pub use page::PageContext;
pub use notify_bridge_config as config;
