//! The notification client: one owned real-time connection per page.
//!
//! The client reacts to four connection events:
//! - `Connected` shows an informational notification
//! - `Notification` shows the message and asks the page to refresh its
//!   application list (customer pages only when a report is attached, admin
//!   pages always)
//! - `Disconnected` shows an error notification
//! - `ConnectError` logs the failure and shows an error notification
//!
//! There is no automatic reconnection; only an explicit [`NotificationClient::connect`]
//! opens a new connection.
//!
//! # Example
//!
//! ```rust,no_run
//! use notify_bridge::client::NotificationClient;
//! use notify_bridge::notification::{ConsolePresenter, NotificationBoard};
//! use notify_bridge::page::PageContext;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let mut client = NotificationClient::builder(PageContext::Customer)
//!     .board(NotificationBoard::new(Arc::new(ConsolePresenter)))
//!     .build();
//! client.start();
//! client.run_until(async { let _ = tokio::signal::ctrl_c().await; }).await;
//! # }
//! ```

use crate::notification::NotificationBoard;
use crate::page::PageContext;
use crate::protocol::ServerEvent;
use crate::refresh::{ApplicationLists, CommandLists};
use crate::speech::{SilentSpeaker, Speaker, detect_locale};
use crate::transport::{
    ConnectRequest, ConnectionEvent, ConnectionHandle, Connector, EventSender, WsConnector,
};
use notify_bridge_config::{Config, SessionStore, UserId};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Shown when the namespace CONNECT is acknowledged.
pub const CONNECTED_MESSAGE: &str = "Connected to real-time server.";
/// Shown (as an error) when an established connection is lost.
pub const DISCONNECTED_MESSAGE: &str = "Disconnected from real-time server.";
/// Shown (as an error) when the connection cannot be established.
pub const CONNECT_FAILED_MESSAGE: &str =
    "Real-time connection failed. Refreshing the page might help.";

/// Source of the signed-in user's identity, read at connect time.
pub trait SessionSource: Send + Sync {
    fn user_id(&self) -> Option<UserId>;
}

impl SessionSource for SessionStore {
    fn user_id(&self) -> Option<UserId> {
        match self.load() {
            Ok(user) => user.map(|u| u.id),
            Err(e) => {
                log::warn!("Ignoring unreadable session at {:?}: {}", self.path(), e);
                None
            }
        }
    }
}

impl SessionSource for Option<UserId> {
    fn user_id(&self) -> Option<UserId> {
        self.clone()
    }
}

/// Where to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub endpoint: String,
    pub socket_path: String,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ConnectionSettings {
    fn from(config: &Config) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            socket_path: config.socket_path.clone(),
        }
    }
}

/// Builder for [`NotificationClient`].
pub struct NotificationClientBuilder {
    page: PageContext,
    settings: ConnectionSettings,
    session: Option<Box<dyn SessionSource>>,
    connector: Option<Arc<dyn Connector>>,
    board: Option<NotificationBoard>,
    speaker: Option<Arc<dyn Speaker>>,
    locale: Option<String>,
    lists: Option<Arc<dyn ApplicationLists>>,
}

impl NotificationClientBuilder {
    pub fn settings(mut self, settings: ConnectionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn session(mut self, session: impl SessionSource + 'static) -> Self {
        self.session = Some(Box::new(session));
        self
    }

    pub fn connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Notifications container. Without one, notifications are dropped.
    pub fn board(mut self, board: NotificationBoard) -> Self {
        self.board = Some(board);
        self
    }

    pub fn speaker(mut self, speaker: Arc<dyn Speaker>) -> Self {
        self.speaker = Some(speaker);
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn lists(mut self, lists: Arc<dyn ApplicationLists>) -> Self {
        self.lists = Some(lists);
        self
    }

    /// Defaults: the persisted session store, a WebSocket connector, no
    /// container, no speech, the detected locale, and refresh requests that
    /// are only logged.
    pub fn build(self) -> NotificationClient {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        NotificationClient {
            page: self.page,
            settings: self.settings,
            session: self
                .session
                .unwrap_or_else(|| Box::new(SessionStore::default_location())),
            connector: self
                .connector
                .unwrap_or_else(|| Arc::new(WsConnector::default())),
            board: self.board,
            speaker: self.speaker.unwrap_or_else(|| Arc::new(SilentSpeaker)),
            locale: self.locale.unwrap_or_else(detect_locale),
            lists: self
                .lists
                .unwrap_or_else(|| Arc::new(CommandLists::default())),
            connection: None,
            generation: 0,
            events_tx,
            events_rx,
        }
    }
}

/// Owns at most one live connection and renders what it receives.
pub struct NotificationClient {
    page: PageContext,
    settings: ConnectionSettings,
    session: Box<dyn SessionSource>,
    connector: Arc<dyn Connector>,
    board: Option<NotificationBoard>,
    speaker: Arc<dyn Speaker>,
    locale: String,
    lists: Arc<dyn ApplicationLists>,
    connection: Option<ConnectionHandle>,
    generation: u64,
    events_tx: mpsc::UnboundedSender<ConnectionEvent>,
    events_rx: mpsc::UnboundedReceiver<ConnectionEvent>,
}

impl NotificationClient {
    pub fn builder(page: PageContext) -> NotificationClientBuilder {
        NotificationClientBuilder {
            page,
            settings: ConnectionSettings::default(),
            session: None,
            connector: None,
            board: None,
            speaker: None,
            locale: None,
            lists: None,
        }
    }

    pub fn page(&self) -> PageContext {
        self.page
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn board(&self) -> Option<&NotificationBoard> {
        self.board.as_ref()
    }

    /// Whether a connection is currently owned (open or opening).
    pub fn has_connection(&self) -> bool {
        self.connection.is_some()
    }

    /// Generation of the most recently opened connection (0 before the first).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Load-time trigger: connect once if this page wants real-time updates.
    pub fn start(&mut self) {
        if self.page.wants_realtime() {
            self.connect();
        } else {
            log::debug!("Page '{}' does not use real-time updates", self.page);
        }
    }

    /// Open a connection for the stored session, replacing any existing one.
    ///
    /// Without a stored session this does nothing, and an existing
    /// connection is left untouched.
    ///
    /// Teardown of the previous connection is asynchronous: its task may
    /// still be closing its socket while the new one opens, but nothing it
    /// reports after this call reaches [`Self::dispatch`].
    pub fn connect(&mut self) {
        let Some(user_id) = self.session.user_id() else {
            log::debug!("No stored session; not connecting");
            return;
        };

        if let Some(previous) = self.connection.take() {
            log::info!(
                "Replacing real-time connection (generation {})",
                previous.generation()
            );
            previous.close();
        }

        self.generation += 1;
        let request = ConnectRequest {
            endpoint: self.settings.endpoint.clone(),
            path: self.settings.socket_path.clone(),
            user_id,
        };
        log::info!(
            "Opening real-time connection to {} for user {} (generation {})",
            request.endpoint,
            request.user_id,
            self.generation
        );
        let events = EventSender::new(self.generation, self.events_tx.clone());
        self.connection = Some(self.connector.open(request, events));
    }

    /// Tear down the owned connection, if any.
    pub fn disconnect(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close();
        }
    }

    /// Route an event from the channel, dropping events of superseded or
    /// closed connections. Returns whether the event was handled.
    pub fn dispatch(&mut self, event: ConnectionEvent) -> bool {
        if self.connection.is_none() || event.generation != self.generation {
            log::debug!(
                "Ignoring {:?} from stale connection (generation {}, current {})",
                event.event,
                event.generation,
                self.generation
            );
            return false;
        }
        self.handle_event(event.event);
        true
    }

    /// React to one event of the current connection.
    pub fn handle_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Connected => {
                log::info!("Connected to real-time server");
                self.show_notification(CONNECTED_MESSAGE, false);
            }
            ServerEvent::Notification(payload) => {
                self.show_notification(&payload.message, false);

                if payload.has_report() && self.page == PageContext::Customer {
                    self.lists.load_user_applications();
                }
                // Independent of the payload.
                if self.page == PageContext::Admin {
                    self.lists.load_admin_applications();
                }
            }
            ServerEvent::Disconnected { reason } => {
                log::info!("Real-time connection closed: {}", reason);
                self.connection = None;
                self.show_notification(DISCONNECTED_MESSAGE, true);
            }
            ServerEvent::ConnectError { message } => {
                log::error!("WebSocket connection error: {}", message);
                self.connection = None;
                self.show_notification(CONNECT_FAILED_MESSAGE, true);
            }
        }
    }

    /// Post a notification to the container and read it aloud. Does nothing
    /// when there is no container.
    pub fn show_notification(&self, message: &str, is_error: bool) {
        let Some(board) = &self.board else {
            log::debug!("No notification container; dropping '{}'", message);
            return;
        };
        board.post(message, is_error);
        self.speaker.speak(message, &self.locale);
    }

    /// Handle every queued event without waiting. Returns how many were
    /// taken off the queue.
    pub fn drain_pending(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.dispatch(event);
            count += 1;
        }
        count
    }

    /// Event loop: handle events until `shutdown` resolves, then dispose of
    /// the connection.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                Some(event) = self.events_rx.recv() => {
                    self.dispatch(event);
                }
            }
        }
        self.disconnect();
    }
}

impl std::fmt::Debug for NotificationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationClient")
            .field("page", &self.page)
            .field("settings", &self.settings)
            .field("generation", &self.generation)
            .field("connected", &self.connection.is_some())
            .finish()
    }
}
