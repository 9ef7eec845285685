//! Transient notifications.
//!
//! [`NotificationBoard`] is the notifications container: it keeps the live
//! entries in insertion order, hands each one to a [`Presenter`], and removes
//! it exactly [`DISPLAY_DURATION`] after it was posted. Removals cannot be
//! cancelled and there is no cap or de-duplication.

mod presenter;

pub use presenter::{ConsolePresenter, DesktopPresenter, Presenter};

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// How long every notification stays in the container.
pub const DISPLAY_DURATION: Duration = Duration::from_millis(5000);

/// One displayed notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEntry {
    pub id: u64,
    pub message: String,
    pub is_error: bool,
    pub created_at: DateTime<Local>,
}

/// Shared container of live notifications. Cloning shares the same entries.
#[derive(Clone)]
pub struct NotificationBoard {
    inner: Arc<BoardInner>,
}

struct BoardInner {
    entries: Mutex<Vec<NotificationEntry>>,
    presenter: Arc<dyn Presenter>,
    next_id: AtomicU64,
}

impl NotificationBoard {
    pub fn new(presenter: Arc<dyn Presenter>) -> Self {
        Self {
            inner: Arc::new(BoardInner {
                entries: Mutex::new(Vec::new()),
                presenter,
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Append a notification, present it, and schedule its removal.
    ///
    /// Inside a tokio runtime the removal is a timer task; outside one it
    /// falls back to a sleeping thread.
    pub fn post(&self, message: &str, is_error: bool) -> u64 {
        let deadline = tokio::time::Instant::now() + DISPLAY_DURATION;
        let entry = NotificationEntry {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
            message: message.to_string(),
            is_error,
            created_at: Local::now(),
        };
        let id = entry.id;

        self.inner.entries.lock().push(entry.clone());
        self.inner.presenter.present(&entry);

        let board = self.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep_until(deadline).await;
                    board.remove(id);
                });
            }
            Err(_) => {
                std::thread::spawn(move || {
                    std::thread::sleep(DISPLAY_DURATION);
                    board.remove(id);
                });
            }
        }
        id
    }

    fn remove(&self, id: u64) {
        let removed = {
            let mut entries = self.inner.entries.lock();
            entries
                .iter()
                .position(|e| e.id == id)
                .map(|idx| entries.remove(idx))
        };
        if let Some(entry) = removed {
            self.inner.presenter.dismiss(&entry);
        }
    }

    /// Snapshot of the live entries, oldest first.
    pub fn entries(&self) -> Vec<NotificationEntry> {
        self.inner.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for NotificationBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBoard")
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingPresenter {
        presented: Mutex<Vec<u64>>,
        dismissed: Mutex<Vec<u64>>,
    }

    impl Presenter for CountingPresenter {
        fn present(&self, entry: &NotificationEntry) {
            self.presented.lock().push(entry.id);
        }

        fn dismiss(&self, entry: &NotificationEntry) {
            self.dismissed.lock().push(entry.id);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_post_keeps_insertion_order() {
        let presenter = Arc::new(CountingPresenter::default());
        let board = NotificationBoard::new(presenter.clone());

        let first = board.post("first", false);
        let second = board.post("second", true);
        let third = board.post("first", false);

        let entries = board.entries();
        assert_eq!(
            entries.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![first, second, third]
        );
        assert!(entries[1].is_error);
        // Duplicates are kept.
        assert_eq!(entries[0].message, entries[2].message);
        assert_eq!(*presenter.presented.lock(), vec![first, second, third]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_removed_at_display_deadline() {
        let presenter = Arc::new(CountingPresenter::default());
        let board = NotificationBoard::new(presenter.clone());

        let id = board.post("Report ready", false);

        tokio::time::sleep(DISPLAY_DURATION - Duration::from_millis(1)).await;
        assert_eq!(board.len(), 1, "entry removed before the display window ended");

        tokio::time::sleep(Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert!(board.is_empty(), "entry still present at the deadline");
        assert_eq!(*presenter.dismissed.lock(), vec![id]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_removals_are_independent() {
        let board = NotificationBoard::new(Arc::new(CountingPresenter::default()));

        board.post("early", false);
        tokio::time::sleep(Duration::from_millis(2000)).await;
        let late = board.post("late", false);

        tokio::time::sleep(Duration::from_millis(3001)).await;
        let remaining = board.entries();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, late);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert!(board.is_empty());
    }
}
