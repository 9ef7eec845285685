//! Wiring between the loaded configuration and a running client.

use crate::cli::RunArgs;
use crate::client::{ConnectionSettings, NotificationClient, SessionSource};
use crate::error::Result;
use crate::notification::{
    ConsolePresenter, DISPLAY_DURATION, DesktopPresenter, NotificationBoard, Presenter,
};
use crate::page::PageContext;
use crate::refresh::CommandLists;
use crate::speech::{SilentSpeaker, Speaker, SystemSpeaker, detect_locale, normalize_locale};
use crate::transport::WsConnector;
use notify_bridge_config::{Config, PresenterKind};
use std::sync::Arc;
use std::time::Duration;

/// Presentation and speech choices after CLI overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOptions {
    pub presenter: PresenterKind,
    pub speech: bool,
}

impl OutputOptions {
    pub fn resolve(config: &Config, console: bool, no_speech: bool) -> Self {
        Self {
            presenter: if console {
                PresenterKind::Console
            } else {
                config.presenter
            },
            speech: config.speech_enabled && !no_speech,
        }
    }

    pub fn presenter(&self) -> Arc<dyn Presenter> {
        match self.presenter {
            PresenterKind::Desktop => Arc::new(DesktopPresenter),
            PresenterKind::Console => Arc::new(ConsolePresenter),
        }
    }

    pub fn speaker(&self) -> Arc<dyn Speaker> {
        if self.speech {
            Arc::new(SystemSpeaker)
        } else {
            Arc::new(SilentSpeaker)
        }
    }
}

/// Configured locale if it parses, else the detected one.
pub fn resolve_locale(config: &Config) -> String {
    config
        .speech_locale
        .as_deref()
        .and_then(|raw| {
            let locale = normalize_locale(raw);
            if locale.is_none() {
                log::warn!("Ignoring invalid speech_locale '{}'", raw);
            }
            locale
        })
        .unwrap_or_else(detect_locale)
}

/// Build a client wired to the real connector, presenter, speaker and
/// refresh commands.
pub fn build_client(
    config: &Config,
    page: PageContext,
    output: OutputOptions,
    session: impl SessionSource + 'static,
) -> Result<NotificationClient> {
    let lists = CommandLists::from_config(config)?;
    Ok(NotificationClient::builder(page)
        .settings(ConnectionSettings::from(config))
        .session(session)
        .connector(Arc::new(WsConnector::new(Duration::from_secs(
            config.connect_timeout_secs,
        ))))
        .board(NotificationBoard::new(output.presenter()))
        .speaker(output.speaker())
        .locale(resolve_locale(config))
        .lists(Arc::new(lists))
        .build())
}

/// Resolves on Ctrl+C, or after `exit_after` seconds when given.
pub async fn shutdown_signal(exit_after: Option<f64>) {
    let timer = async {
        match exit_after.filter(|secs| secs.is_finite() && *secs >= 0.0) {
            Some(secs) => tokio::time::sleep(Duration::from_secs_f64(secs)).await,
            None => std::future::pending::<()>().await,
        }
    };
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    tokio::select! {
        _ = interrupt => log::info!("Interrupted, shutting down"),
        _ = timer => log::info!("Exit timer elapsed, shutting down"),
    }
}

/// `run`: connect (when the page wants it) and render until shutdown.
pub async fn run(
    config: &Config,
    args: &RunArgs,
    session: impl SessionSource + 'static,
) -> Result<()> {
    let page = args.page_context();
    let output = OutputOptions::resolve(config, args.console, args.no_speech);
    let mut client = build_client(config, page, output, session)?;
    log::info!("Running as '{}' page", page);

    client.start();
    if !client.has_connection() && page.wants_realtime() {
        log::warn!("No session stored; run `notify-bridge session set <USER_ID>` first");
    }
    client.run_until(shutdown_signal(args.exit_after)).await;
    Ok(())
}

/// `notify`: show one local notification and wait for it to expire.
pub async fn notify_once(config: &Config, message: &str, is_error: bool, console: bool) {
    let output = OutputOptions::resolve(config, console, false);
    let board = NotificationBoard::new(output.presenter());
    board.post(message, is_error);
    output.speaker().speak(message, &resolve_locale(config));
    tokio::time::sleep(DISPLAY_DURATION).await;
    tokio::task::yield_now().await;
}
