//! Command-line interface for notify-bridge.
//!
//! This module handles CLI argument parsing and the small synchronous
//! subcommands (session management and the health probe). The event loop
//! behind `run` lives in [`crate::app`].

use crate::page::PageContext;
use clap::{Args, Parser, Subcommand};
use notify_bridge_config::{Config, SessionStore, SessionUser, UserId};
use std::path::{Path, PathBuf};

/// notify-bridge - desktop notifications from the real-time backend
#[derive(Parser)]
#[command(name = "notify-bridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of ~/.config/notify-bridge/config.yaml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set log level (overrides config and RUST_LOG)
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Page argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PageArg {
    Customer,
    Admin,
    Other,
}

impl From<PageArg> for PageContext {
    fn from(arg: PageArg) -> Self {
        match arg {
            PageArg::Customer => PageContext::Customer,
            PageArg::Admin => PageContext::Admin,
            PageArg::Other => PageContext::Other,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Connect and show notifications until interrupted
    Run(RunArgs),

    /// Manage the stored session identity
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },

    /// Check that the backend answers its health endpoint
    Health,

    /// Show a single local notification and exit after it expires
    Notify {
        /// Text to show
        message: String,

        /// Flag the notification as an error
        #[arg(long)]
        error: bool,

        /// Print to the console instead of a desktop notification
        #[arg(long)]
        console: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Page this client is attached to
    #[arg(long, value_enum, conflicts_with = "path")]
    pub page: Option<PageArg>,

    /// Page path to derive the page from (e.g. /static/admin.html)
    #[arg(long, value_name = "PATH")]
    pub path: Option<String>,

    /// Print notifications to the console instead of the desktop
    #[arg(long)]
    pub console: bool,

    /// Do not read notifications aloud
    #[arg(long)]
    pub no_speech: bool,

    /// Exit after the specified number of seconds
    #[arg(long, value_name = "SECONDS")]
    pub exit_after: Option<f64>,
}

impl RunArgs {
    /// Explicit `--page` wins over `--path`; neither means `other`.
    pub fn page_context(&self) -> PageContext {
        match (self.page, &self.path) {
            (Some(page), _) => page.into(),
            (None, Some(path)) => PageContext::from_path(path),
            (None, None) => PageContext::Other,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// Store the identity used to authenticate the real-time connection
    Set {
        /// User id issued by the backend
        user_id: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        role: Option<String>,
    },
    /// Print the stored identity
    Show,
    /// Forget the stored identity
    Clear,
}

/// Load the config from `--config` or the default location.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Session store beside the config file in use.
pub fn session_store_for(config_path: Option<&Path>) -> SessionStore {
    match config_path.and_then(Path::parent) {
        Some(dir) if !dir.as_os_str().is_empty() => SessionStore::new(dir.join("session.json")),
        _ => SessionStore::default_location(),
    }
}

/// Execute a `session` subcommand.
pub fn session_command(store: &SessionStore, action: SessionCommand) -> anyhow::Result<()> {
    match action {
        SessionCommand::Set {
            user_id,
            email,
            role,
        } => {
            if user_id.trim().is_empty() {
                anyhow::bail!("user id must not be empty");
            }
            let user = SessionUser {
                id: UserId::parse(&user_id),
                email,
                role,
            };
            store.save(&user)?;
            println!("Session stored for user {}", user.id);
        }
        SessionCommand::Show => match store.load()? {
            Some(user) => {
                println!("user id: {}", user.id);
                if let Some(email) = user.email {
                    println!("email:   {}", email);
                }
                if let Some(role) = user.role {
                    println!("role:    {}", role);
                }
            }
            None => println!("No session stored at {}", store.path().display()),
        },
        SessionCommand::Clear => {
            store.clear()?;
            println!("Session cleared");
        }
    }
    Ok(())
}

/// Execute the `health` subcommand.
pub fn health_command(config: &Config) -> anyhow::Result<()> {
    let status = crate::http::check_health(&config.endpoint)?;
    if status.is_ok() {
        println!("Backend healthy ({})", status.status);
        Ok(())
    } else {
        anyhow::bail!("Backend reported status '{}'", status.status)
    }
}
