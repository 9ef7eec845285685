//! Cross-platform desktop notification delivery.
//!
//! Abstracts over:
//! - **macOS**: `osascript` AppleScript `display notification` command
//! - **Windows / Linux**: the `notify_rust` crate

use std::thread::JoinHandle;

/// Title used when the caller passes an empty one.
const DEFAULT_TITLE: &str = "Notification";

/// Escape a string for safe embedding inside an AppleScript double-quoted string.
///
/// Backslashes must be escaped first so the later replacements are not
/// double-escaped.
pub fn escape_for_applescript(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Deliver a native desktop notification without blocking the caller.
///
/// The OS call (D-Bus on Linux, `osascript` on macOS, the toast API on
/// Windows) runs on a short-lived `desktop-notify` thread. Failures are logged
/// as warnings. Returns the delivery thread, or `None` if it could not be
/// started.
pub fn deliver_desktop_notification(
    title: &str,
    message: &str,
    timeout_ms: u32,
) -> Option<JoinHandle<()>> {
    let title = if title.is_empty() { DEFAULT_TITLE } else { title }.to_string();
    let message = message.to_string();
    spawn_delivery(move || show_blocking(&title, &message, timeout_ms))
}

/// Run a blocking delivery on its own named thread.
pub fn spawn_delivery<F>(deliver: F) -> Option<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    match std::thread::Builder::new()
        .name("desktop-notify".to_string())
        .spawn(deliver)
    {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("Failed to start desktop notification thread: {}", e);
            None
        }
    }
}

#[cfg(not(target_os = "macos"))]
fn show_blocking(title: &str, message: &str, timeout_ms: u32) {
    use notify_rust::Notification;
    if let Err(e) = Notification::new()
        .summary(title)
        .body(message)
        .timeout(notify_rust::Timeout::Milliseconds(timeout_ms))
        .show()
    {
        log::warn!("Failed to send desktop notification: {}", e);
    }
}

#[cfg(target_os = "macos")]
fn show_blocking(title: &str, message: &str, _timeout_ms: u32) {
    // Notification Center decides how long the banner stays.
    let script = format!(
        r#"display notification "{}" with title "{}""#,
        escape_for_applescript(message),
        escape_for_applescript(title),
    );
    match std::process::Command::new("osascript")
        .arg("-e")
        .arg(&script)
        .output()
    {
        Ok(output) if !output.status.success() => log::warn!(
            "osascript exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ),
        Ok(_) => {}
        Err(e) => log::warn!("Failed to send macOS desktop notification: {}", e),
    }
}
