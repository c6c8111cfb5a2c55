#![deny(missing_docs)]
//! Shared logging utilities for the sidebar workspace.
//!
//! This crate provides the `sidebar_*` logging macros used across the codebase,
//! the process-wide session tag prefixed to every line, and initializers for the
//! global logger in binaries and tests.

use std::fs::File;
use std::path::Path;
use std::sync::OnceLock;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

#[doc(hidden)]
pub use log as __log;

static SESSION_TAG: OnceLock<String> = OnceLock::new();

/// Records the tag prefixed to every log line, normally the session's client id.
///
/// Only the first call takes effect. Returns `false` if a tag was already set.
pub fn set_session_tag(tag: impl Into<String>) -> bool {
    SESSION_TAG.set(tag.into()).is_ok()
}

/// Returns the session tag, or `-` before one has been recorded.
pub fn session_tag() -> &'static str {
    SESSION_TAG.get().map(String::as_str).unwrap_or("-")
}

/// Logs a trace-level message tagged with the session.
#[macro_export]
macro_rules! sidebar_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!("[{}] {}", $crate::session_tag(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the session.
#[macro_export]
macro_rules! sidebar_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!("[{}] {}", $crate::session_tag(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the session.
#[macro_export]
macro_rules! sidebar_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!("[{}] {}", $crate::session_tag(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the session.
#[macro_export]
macro_rules! sidebar_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!("[{}] {}", $crate::session_tag(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the session.
#[macro_export]
macro_rules! sidebar_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!("[{}] {}", $crate::session_tag(), format_args!($($arg)*));
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to a log file.
    File,
    /// Write to the terminal.
    Terminal,
    /// Write to both file and terminal.
    Both,
}

/// Initializes the global logger for a binary.
///
/// `log_path` is only used for `File` and `Both`. A file that cannot be created
/// is reported on stderr and skipped; terminal output still works.
pub fn initialize(destination: LogDestination, level: LevelFilter, log_path: &Path) {
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if matches!(destination, LogDestination::Terminal | LogDestination::Both) {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if matches!(destination, LogDestination::File | LogDestination::Both) {
        if let Some(file_logger) = create_file_logger(level, config, log_path) {
            loggers.push(file_logger);
        }
    }
    if loggers.is_empty() {
        return;
    }

    let _ = CombinedLogger::init(loggers);
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    level: LevelFilter,
    config: Config,
    log_path: &Path,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::session_tag;

    #[test]
    fn session_tag_defaults_to_dash() {
        // Tests in this binary never set a tag.
        assert_eq!(session_tag(), "-");
    }
}
