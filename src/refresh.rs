//! Application list refresh hooks.
//!
//! The hosting page owns the customer and admin application lists; the
//! client only asks for a refresh. [`CommandLists`] turns each request into
//! a configured command, spawned directly without a shell.

use crate::error::{BridgeError, Result};
use notify_bridge_config::Config;
use std::process::{Command, Stdio};

/// Refresh hooks provided by the hosting page. Both calls are idempotent and
/// must not block.
pub trait ApplicationLists: Send + Sync {
    fn load_user_applications(&self);
    fn load_admin_applications(&self);
}

/// Runs one configured command per refresh kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLists {
    user: Option<Vec<String>>,
    admin: Option<Vec<String>>,
}

impl CommandLists {
    /// Parse both commands. Blank commands count as unset.
    pub fn new(user: Option<&str>, admin: Option<&str>) -> Result<Self> {
        Ok(Self {
            user: parse_command(user)?,
            admin: parse_command(admin)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.user_refresh_command.as_deref(),
            config.admin_refresh_command.as_deref(),
        )
    }

    pub fn user_command(&self) -> Option<&[String]> {
        self.user.as_deref()
    }

    pub fn admin_command(&self) -> Option<&[String]> {
        self.admin.as_deref()
    }
}

impl ApplicationLists for CommandLists {
    fn load_user_applications(&self) {
        run_refresh("customer", self.user.as_deref());
    }

    fn load_admin_applications(&self) {
        run_refresh("admin", self.admin.as_deref());
    }
}

fn parse_command(command: Option<&str>) -> Result<Option<Vec<String>>> {
    let Some(command) = command.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    let argv = shell_words::split(command).map_err(|e| BridgeError::InvalidCommand {
        command: command.to_string(),
        reason: e.to_string(),
    })?;
    Ok(if argv.is_empty() { None } else { Some(argv) })
}

fn run_refresh(list: &str, argv: Option<&[String]>) {
    let Some((program, args)) = argv.and_then(|a| a.split_first()) else {
        log::info!("Refresh of the {} application list requested", list);
        return;
    };

    log::info!("Refreshing the {} application list via '{}'", list, program);
    match Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .spawn()
    {
        Ok(mut child) => {
            let list = list.to_string();
            std::thread::spawn(move || match child.wait() {
                Ok(status) if !status.success() => {
                    log::warn!("{} list refresh command exited with {}", list, status)
                }
                Ok(_) => {}
                Err(e) => log::warn!("Failed to wait for {} list refresh: {}", list, e),
            });
        }
        Err(e) => log::warn!("Failed to run {} list refresh '{}': {}", list, program, e),
    }
}
