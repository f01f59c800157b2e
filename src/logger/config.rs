/// Logger configuration and per-tag filtering state
///
/// The configuration is process-wide: it is installed once by `logger::init`
/// and read on every log call.
use super::levels::LogLevel;
use super::tags::LogTag;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Minimum level shown (Error is always shown)
    pub min_level: LogLevel,

    /// Tags with debug output enabled
    pub debug_tags: HashSet<LogTag>,

    /// Emit ANSI colors on the console
    pub colors: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            colors: true,
        }
    }
}

impl LoggerConfig {
    /// Build a configuration from command-line style switches
    ///
    /// Unknown debug keys are ignored.
    pub fn from_switches(debug_keys: &[String], verbose: bool, quiet: bool) -> Self {
        let mut config = Self::default();

        for key in debug_keys {
            if key.eq_ignore_ascii_case("all") {
                config.debug_tags.extend(LogTag::ALL);
            } else if let Some(tag) = LogTag::from_debug_key(key) {
                config.debug_tags.insert(tag);
            }
        }

        if !config.debug_tags.is_empty() {
            config.min_level = LogLevel::Debug;
        }
        if verbose {
            config.min_level = LogLevel::Verbose;
        }
        if quiet {
            config.min_level = LogLevel::Warning;
        }

        config
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG.read().clone()
}

pub fn set_logger_config(config: LoggerConfig) {
    *LOGGER_CONFIG.write() = config;
}

pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    let config = LOGGER_CONFIG.read();
    config.min_level == LogLevel::Verbose || config.debug_tags.contains(tag)
}
