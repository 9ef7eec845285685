use anyhow::{Context, Result};
use clap::Parser;
use notify_bridge::cli::{self, Cli, Commands, LogLevelArg};
use notify_bridge::{VERSION, app, logging};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI --log-level takes precedence, then RUST_LOG, then config (applied below).
    let filter = logging::init_logging(cli.log_level.map(LogLevelArg::to_level_filter));

    let config =
        cli::load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if filter.config_applies() {
        logging::apply_config_level(config.log_level);
    }
    log::info!("Starting notify-bridge {}", VERSION);

    let session = cli::session_store_for(cli.config.as_deref());

    match cli.command {
        Commands::Session { action } => cli::session_command(&session, action),
        Commands::Health => cli::health_command(&config),
        Commands::Run(args) => {
            // One event loop drives the client, timers and the connection task.
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime
                .block_on(app::run(&config, &args, session))
                .context("Real-time client failed")?;
            Ok(())
        }
        Commands::Notify {
            message,
            error,
            console,
        } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(app::notify_once(&config, &message, error, console));
            Ok(())
        }
    }
}
