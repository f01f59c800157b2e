//! Log formatting and console output with ANSI colors
//!
//! Handles:
//! - Colorized tag and level columns
//! - Continuation indent for multi-line messages
//! - Broken pipe handling for piped commands

use super::config::LoggerConfig;
use super::levels::LogLevel;
use super::tags::LogTag;
use chrono::Local;
use colored::*;
use std::io::{stdout, ErrorKind, Write};

/// Log format widths for alignment
const TAG_WIDTH: usize = 10;
const LEVEL_WIDTH: usize = 7;

pub fn format_and_log(config: &LoggerConfig, tag: LogTag, level: LogLevel, message: &str) {
    let time = Local::now().format("%H:%M:%S").to_string();
    let prefix_width = time.len() + TAG_WIDTH + LEVEL_WIDTH + 6;

    let mut lines = message.lines();
    let first = lines.next().unwrap_or_default();

    let line = if config.colors {
        format!(
            "{} [{}] [{}] {}",
            time.dimmed(),
            format_tag(&tag),
            format_level(level),
            first
        )
    } else {
        format!(
            "{} [{:<tag_width$}] [{:<level_width$}] {}",
            time,
            tag.to_plain_string(),
            level.as_str(),
            first,
            tag_width = TAG_WIDTH,
            level_width = LEVEL_WIDTH
        )
    };
    print_stdout_safe(&line);

    for continuation in lines {
        print_stdout_safe(&format!("{}{}", " ".repeat(prefix_width), continuation));
    }
}

fn format_tag(tag: &LogTag) -> ColoredString {
    let label = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    match tag {
        LogTag::System => label.bright_yellow().bold(),
        LogTag::Config => label.bright_white().bold(),
        LogTag::Api => label.bright_blue().bold(),
        LogTag::Cache => label.bright_cyan().bold(),
        LogTag::Signals => label.bright_magenta().bold(),
        LogTag::Notes => label.bright_green().bold(),
        LogTag::Webserver => label.cyan().bold(),
        LogTag::External => label.dimmed(),
    }
}

fn format_level(level: LogLevel) -> ColoredString {
    let label = format!("{:<width$}", level.as_str(), width = LEVEL_WIDTH);
    match level {
        LogLevel::Error => label.bright_red().bold(),
        LogLevel::Warning => label.bright_yellow().bold(),
        LogLevel::Info => label.white().bold(),
        LogLevel::Debug => label.purple(),
        LogLevel::Verbose => label.dimmed(),
    }
}

/// Print to stdout but ignore broken pipe errors
fn print_stdout_safe(message: &str) {
    let mut out = stdout().lock();
    if let Err(e) = writeln!(out, "{}", message) {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        let _ = writeln!(std::io::stderr(), "Logger stdout error: {}", e);
    }
    let _ = out.flush();
}
