//! Shared integration test helpers for notify-bridge.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::{FakeConnector, RecordingLists, RecordingPresenter, RecordingSpeaker};
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a
//! subset of helpers are used per file.

#![allow(dead_code)]

use notify_bridge::notification::{NotificationBoard, NotificationEntry, Presenter};
use notify_bridge::protocol::ServerEvent;
use notify_bridge::refresh::ApplicationLists;
use notify_bridge::speech::Speaker;
use notify_bridge::transport::{ConnectRequest, ConnectionHandle, Connector, EventSender};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;

/// One connection opened through [`FakeConnector`].
struct FakeConnection {
    request: ConnectRequest,
    events: EventSender,
    shutdown: oneshot::Receiver<()>,
}

/// Connector that never touches the network. Tests push events through
/// [`FakeConnector::emit`] and inspect which connections are still open.
#[derive(Default)]
pub struct FakeConnector {
    connections: Mutex<Vec<FakeConnection>>,
}

impl FakeConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Requests in the order they were opened.
    pub fn requests(&self) -> Vec<ConnectRequest> {
        self.connections
            .lock()
            .iter()
            .map(|c| c.request.clone())
            .collect()
    }

    pub fn opened(&self) -> usize {
        self.connections.lock().len()
    }

    /// Connections whose handle has neither been closed nor dropped.
    pub fn live(&self) -> usize {
        self.connections
            .lock()
            .iter_mut()
            .map(|c| {
                matches!(
                    c.shutdown.try_recv(),
                    Err(oneshot::error::TryRecvError::Empty)
                )
            })
            .filter(|live| *live)
            .count()
    }

    /// Send `event` from the `index`-th opened connection (0-based).
    pub fn emit(&self, index: usize, event: ServerEvent) -> bool {
        let connections = self.connections.lock();
        connections
            .get(index)
            .map(|c| c.events.send(event))
            .unwrap_or(false)
    }

    /// Send `event` from the most recently opened connection.
    pub fn emit_latest(&self, event: ServerEvent) -> bool {
        let index = self.opened().saturating_sub(1);
        self.emit(index, event)
    }
}

impl Connector for FakeConnector {
    fn open(&self, request: ConnectRequest, events: EventSender) -> ConnectionHandle {
        let (tx, rx) = oneshot::channel();
        let handle = ConnectionHandle::new(events.generation(), tx);
        self.connections.lock().push(FakeConnection {
            request,
            events,
            shutdown: rx,
        });
        handle
    }
}

/// Counts refresh requests.
#[derive(Default)]
pub struct RecordingLists {
    user: AtomicUsize,
    admin: AtomicUsize,
}

impl RecordingLists {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn user_loads(&self) -> usize {
        self.user.load(Ordering::SeqCst)
    }

    pub fn admin_loads(&self) -> usize {
        self.admin.load(Ordering::SeqCst)
    }
}

impl ApplicationLists for RecordingLists {
    fn load_user_applications(&self) {
        self.user.fetch_add(1, Ordering::SeqCst);
    }

    fn load_admin_applications(&self) {
        self.admin.fetch_add(1, Ordering::SeqCst);
    }
}

/// Records every utterance as `(text, locale)`.
#[derive(Default)]
pub struct RecordingSpeaker {
    spoken: Mutex<Vec<(String, String)>>,
}

impl RecordingSpeaker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn spoken(&self) -> Vec<(String, String)> {
        self.spoken.lock().clone()
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&self, text: &str, locale: &str) {
        self.spoken
            .lock()
            .push((text.to_string(), locale.to_string()));
    }
}

/// Records presented and dismissed entries.
#[derive(Default)]
pub struct RecordingPresenter {
    presented: Mutex<Vec<NotificationEntry>>,
    dismissed: Mutex<Vec<u64>>,
}

impl RecordingPresenter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn presented(&self) -> Vec<NotificationEntry> {
        self.presented.lock().clone()
    }

    pub fn dismissed(&self) -> Vec<u64> {
        self.dismissed.lock().clone()
    }
}

impl Presenter for RecordingPresenter {
    fn present(&self, entry: &NotificationEntry) {
        self.presented.lock().push(entry.clone());
    }

    fn dismiss(&self, entry: &NotificationEntry) {
        self.dismissed.lock().push(entry.id);
    }
}

/// Board backed by a fresh [`RecordingPresenter`].
pub fn recording_board() -> (NotificationBoard, Arc<RecordingPresenter>) {
    let presenter = RecordingPresenter::new();
    (NotificationBoard::new(presenter.clone()), presenter)
}

/// Let spawned timer tasks run after the clock has been advanced.
pub async fn settle() {
    for _ in 0..3 {
        tokio::task::yield_now().await;
    }
}
