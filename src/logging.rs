//! Logging setup.
//!
//! All crates log through the `log` facade; `env_logger` writes to stderr.
//! Precedence: `--log-level` on the command line, then `RUST_LOG`, then the
//! `log_level` config key (applied once the config has been loaded).

use log::LevelFilter;
use notify_bridge_config::LogLevel;

/// Where the active filter came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSource {
    Cli(LevelFilter),
    Env(String),
    /// Neither flag nor `RUST_LOG`; the config level applies.
    Config,
}

impl FilterSource {
    pub fn resolve(cli_level: Option<LevelFilter>, rust_log: Option<&str>) -> Self {
        match (cli_level, rust_log.map(str::trim).filter(|s| !s.is_empty())) {
            (Some(level), _) => FilterSource::Cli(level),
            (None, Some(directives)) => FilterSource::Env(directives.to_string()),
            (None, None) => FilterSource::Config,
        }
    }

    /// Whether the config `log_level` may still change the filter.
    pub fn config_applies(&self) -> bool {
        matches!(self, FilterSource::Config)
    }
}

/// Install the global logger. Returns where the filter came from so the
/// caller knows whether to call [`apply_config_level`] later.
pub fn init_logging(cli_level: Option<LevelFilter>) -> FilterSource {
    let rust_log = std::env::var("RUST_LOG").ok();
    let source = FilterSource::resolve(cli_level, rust_log.as_deref());

    let mut builder = env_logger::Builder::new();
    builder.format_timestamp_millis();
    match &source {
        FilterSource::Cli(level) => {
            builder.filter_level(*level);
        }
        FilterSource::Env(directives) => {
            builder.parse_filters(directives);
        }
        FilterSource::Config => {
            // Let everything through the logger; the global max level is
            // the actual gate and is lowered once the config is known.
            builder.filter_level(LevelFilter::Trace);
        }
    }

    if let Err(e) = builder.try_init() {
        eprintln!("notify-bridge: logger already initialised: {e}");
        return source;
    }
    if source.config_applies() {
        log::set_max_level(LogLevel::default().to_level_filter());
    }
    source
}

/// Apply the config `log_level`.
pub fn apply_config_level(level: LogLevel) {
    log::set_max_level(level.to_level_filter());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_level_wins() {
        assert_eq!(
            FilterSource::resolve(Some(LevelFilter::Debug), Some("warn")),
            FilterSource::Cli(LevelFilter::Debug)
        );
    }

    #[test]
    fn test_rust_log_beats_config() {
        let source = FilterSource::resolve(None, Some("notify_bridge=trace"));
        assert_eq!(source, FilterSource::Env("notify_bridge=trace".to_string()));
        assert!(!source.config_applies());
    }

    #[test]
    fn test_blank_rust_log_falls_back_to_config() {
        assert!(FilterSource::resolve(None, Some("  ")).config_applies());
        assert!(FilterSource::resolve(None, None).config_applies());
    }
}
