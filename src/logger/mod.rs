//! Structured logging for drugsignals
//!
//! Provides a small tagged logging API:
//! - Standard levels (Error/Warning/Info/Debug/Verbose)
//! - Per-tag debug control via `--debug <tag>`
//! - Colored console output
//!
//! ## Usage
//!
//! ```rust
//! use drugsignals::logger::{self, LogTag};
//!
//! logger::error(LogTag::Api, "Connection failed");
//! logger::info(LogTag::Signals, "Analysis cached");
//! logger::debug(LogTag::Cache, "Joined in-flight computation"); // Only with --debug cache
//! ```
//!
//! `init` must be called once at startup. It also installs a bridge for the
//! `log` facade so records from reqwest, hyper and friends are formatted the
//! same way under `LogTag::External`.

mod config;
mod core;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, is_debug_enabled_for_tag, set_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Install the configuration and the `log` bridge
///
/// Calling it more than once only replaces the configuration.
pub fn init(config: LoggerConfig) {
    let max_level = match config.min_level {
        LogLevel::Verbose => log::LevelFilter::Trace,
        LogLevel::Debug => log::LevelFilter::Debug,
        _ => log::LevelFilter::Warn,
    };
    set_logger_config(config);

    if log::set_logger(&LOG_BRIDGE).is_ok() {
        log::set_max_level(max_level);
    }
}

/// Always shown, critical failures
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Issues that need attention but are not fatal
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Only shown when the tag was enabled with `--debug <tag>`
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Only shown with `--verbose`
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

struct LogBridge;

static LOG_BRIDGE: LogBridge = LogBridge;

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Third-party debug output is only interesting with --debug external
        let level = LogLevel::from(record.level());
        if level >= LogLevel::Debug && !is_debug_enabled_for_tag(&LogTag::External) {
            return;
        }
        core::log_internal(
            LogTag::External,
            level,
            &format!("{}: {}", record.target(), record.args()),
        );
    }

    fn flush(&self) {}
}
