//! Platform abstraction layer for notify-bridge.
//!
//! Every public function here has one cross-platform signature; the
//! `#[cfg(target_os = ...)]` branching lives inside the function body so
//! callers never need `#[cfg]` attributes.

mod notify;

pub use notify::{deliver_desktop_notification, escape_for_applescript, spawn_delivery};
