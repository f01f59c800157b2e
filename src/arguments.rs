/// Command-line arguments
///
/// Parsed once in `main`; nothing reads the process arguments afterwards.
/// Host and port given here win over the config file and environment.
use crate::config::{Config, CONFIG_FILE_PATH};
use crate::logger::{self, LogTag, LoggerConfig};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "drugsignals")]
#[command(about = "Drug interaction notes and openFDA adverse-event signals over HTTP", long_about = None)]
pub struct Arguments {
    /// Path to the TOML configuration file
    #[arg(long, default_value = CONFIG_FILE_PATH)]
    pub config: PathBuf,

    /// Bind host (overrides webserver.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides webserver.port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Enable debug output for a log tag (repeatable; "all" for every tag)
    #[arg(long = "debug", value_name = "TAG")]
    pub debug: Vec<String>,

    /// Show verbose output from every tag
    #[arg(short, long)]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Plain console output without ANSI colors
    #[arg(long)]
    pub no_color: bool,
}

impl Arguments {
    pub fn logger_config(&self) -> LoggerConfig {
        let mut config = LoggerConfig::from_switches(&self.debug, self.verbose, self.quiet);
        config.colors = !self.no_color;
        config
    }

    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.webserver.host = host.clone();
        }
        if let Some(port) = self.port {
            config.webserver.port = port;
        }
    }

    /// Debug keys that do not name a log tag
    pub fn unknown_debug_keys(&self) -> Vec<&str> {
        self.debug
            .iter()
            .map(String::as_str)
            .filter(|key| !key.eq_ignore_ascii_case("all") && LogTag::from_debug_key(key).is_none())
            .collect()
    }
}

/// Log which debug switches are active
pub fn print_debug_info(args: &Arguments) {
    for key in args.unknown_debug_keys() {
        logger::warning(
            LogTag::System,
            &format!("Unknown debug tag '{}' ignored", key),
        );
    }

    let enabled: Vec<&str> = LogTag::ALL
        .iter()
        .filter(|tag| logger::is_debug_enabled_for_tag(tag))
        .map(|tag| tag.to_debug_key())
        .collect();
    if !enabled.is_empty() {
        logger::info(
            LogTag::System,
            &format!("Debug output enabled for: {}", enabled.join(", ")),
        );
    }
}
