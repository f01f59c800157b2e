/// Core logging implementation with automatic filtering
///
/// Decides whether a record is shown, then hands it to the formatter.
use super::config::{get_logger_config, LoggerConfig};
use super::levels::LogLevel;
use super::tags::LogTag;

/// Filtering rules:
/// 1. Errors are always shown
/// 2. Anything above the minimum level is dropped
/// 3. Debug requires the tag to be debug-enabled (or verbose mode)
pub fn should_log(config: &LoggerConfig, tag: &LogTag, level: LogLevel) -> bool {
    if level == LogLevel::Error {
        return true;
    }

    if level > config.min_level {
        return false;
    }

    if level == LogLevel::Debug
        && config.min_level != LogLevel::Verbose
        && !config.debug_tags.contains(tag)
    {
        return false;
    }

    true
}

pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    let config = get_logger_config();
    if !should_log(&config, &tag, level) {
        return;
    }

    super::format::format_and_log(&config, tag, level, message);
}
