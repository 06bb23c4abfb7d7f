#![deny(missing_docs)]
//! Shared logging utilities for the harvest workspace.
//!
//! This crate provides the `harvest_*` logging macros used across the codebase,
//! the logger initialization for the binary and a minimal test initializer.
//! Every line is tagged with the [`Phase`] that produced it, e.g.
//! `[AutoScroll] Current item count: 42`.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// The stage of a harvest run a log line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Process setup: config, browser session, output directory.
    Startup,
    /// Polling for the list container.
    WaitForContainer,
    /// Scrolling the container until the item count stops growing.
    AutoScroll,
    /// Visiting items one at a time.
    ClickPhase,
    /// End-of-run reporting.
    Summary,
}

impl Phase {
    /// Label printed in brackets in front of each message.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Startup => "Startup",
            Phase::WaitForContainer => "WaitForContainer",
            Phase::AutoScroll => "AutoScroll",
            Phase::ClickPhase => "ClickPhase",
            Phase::Summary => "Summary",
        }
    }
}

/// Logs a trace-level message tagged with a [`Phase`].
#[macro_export]
macro_rules! harvest_trace {
    ($phase:expr, $($arg:tt)*) => {{
        log::trace!("[{}] {}", $crate::Phase::label($phase), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with a [`Phase`].
#[macro_export]
macro_rules! harvest_debug {
    ($phase:expr, $($arg:tt)*) => {{
        log::debug!("[{}] {}", $crate::Phase::label($phase), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with a [`Phase`].
#[macro_export]
macro_rules! harvest_info {
    ($phase:expr, $($arg:tt)*) => {{
        log::info!("[{}] {}", $crate::Phase::label($phase), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with a [`Phase`].
#[macro_export]
macro_rules! harvest_warn {
    ($phase:expr, $($arg:tt)*) => {{
        log::warn!("[{}] {}", $crate::Phase::label($phase), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with a [`Phase`].
#[macro_export]
macro_rules! harvest_error {
    ($phase:expr, $($arg:tt)*) => {{
        log::error!("[{}] {}", $crate::Phase::label($phase), format_args!($($arg)*));
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to the given log file only.
    File,
    /// Write to terminal (stderr for warnings and errors, stdout otherwise).
    Terminal,
    /// Write to both file and terminal.
    Both,
}

/// Initialize the global logger.
///
/// For `LogDestination::File` or `Both`, `log_path` is created (truncated if it
/// exists). A file that cannot be created is reported on stderr and skipped.
pub fn initialize(destination: LogDestination, level: LevelFilter, log_path: &Path) {
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::File => match create_file_logger(level, config, log_path) {
            Some(file_logger) => vec![file_logger],
            None => return,
        },
        LogDestination::Terminal => {
            vec![TermLogger::new(
                level,
                config,
                TerminalMode::Mixed,
                ColorChoice::Auto,
            )]
        }
        LogDestination::Both => {
            let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
                level,
                config.clone(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            )];
            if let Some(file_logger) = create_file_logger(level, config, log_path) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    let _ = CombinedLogger::init(loggers);
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

#[cfg(test)]
mod tests {
    use super::Phase;

    #[test]
    fn phase_labels_match_log_tags() {
        assert_eq!(Phase::WaitForContainer.label(), "WaitForContainer");
        assert_eq!(Phase::AutoScroll.label(), "AutoScroll");
        assert_eq!(Phase::ClickPhase.label(), "ClickPhase");
    }

    #[test]
    fn macros_accept_format_arguments() {
        super::initialize_for_tests();
        let count = 3;
        harvest_info!(Phase::AutoScroll, "Current item count: {}", count);
        harvest_warn!(Phase::ClickPhase, "No clickable element found in item, skipping.");
    }
}
