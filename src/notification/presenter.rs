//! Rendering backends for [`super::NotificationBoard`].

use super::{DISPLAY_DURATION, NotificationEntry};
use std::io::Write;

/// Renders notifications. Implementations must not block for long and must
/// swallow their own failures.
pub trait Presenter: Send + Sync {
    fn present(&self, entry: &NotificationEntry);

    /// Called when the entry leaves the container.
    fn dismiss(&self, _entry: &NotificationEntry) {}
}

/// Native desktop notifications that expire with the display window.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopPresenter;

impl Presenter for DesktopPresenter {
    fn present(&self, entry: &NotificationEntry) {
        let title = if entry.is_error { "Error" } else { "Notification" };
        // Detached: the delivery thread finishes on its own.
        let _ = crate::platform::deliver_desktop_notification(
            title,
            &entry.message,
            DISPLAY_DURATION.as_millis() as u32,
        );
    }
}

/// Prints one line per notification to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePresenter;

impl ConsolePresenter {
    /// The line printed for `entry`.
    pub fn format_line(entry: &NotificationEntry) -> String {
        let marker = if entry.is_error { " [error]" } else { "" };
        format!(
            "{}{} {}",
            entry.created_at.format("%H:%M:%S"),
            marker,
            entry.message
        )
    }
}

impl Presenter for ConsolePresenter {
    fn present(&self, entry: &NotificationEntry) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", Self::format_line(entry)) {
            log::warn!("Failed to print notification: {}", e);
        }
    }

    fn dismiss(&self, entry: &NotificationEntry) {
        log::debug!("Notification {} expired", entry.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn entry(is_error: bool) -> NotificationEntry {
        NotificationEntry {
            id: 1,
            message: "Application approved".to_string(),
            is_error,
            created_at: Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 5).unwrap(),
        }
    }

    #[test]
    fn test_console_line() {
        assert_eq!(
            ConsolePresenter::format_line(&entry(false)),
            "09:30:05 Application approved"
        );
    }

    #[test]
    fn test_console_line_flags_errors() {
        assert_eq!(
            ConsolePresenter::format_line(&entry(true)),
            "09:30:05 [error] Application approved"
        );
    }
}
