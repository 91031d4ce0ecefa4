//! Logger Module
//!
//! A logging system based on `tracing-subscriber` with support for:
//! - Console output with color control, written to stderr so stdout stays
//!   free for command output
//! - File output with multiple formats (Full, Compact, JSON)
//! - Falling back to stderr when the log file cannot be written

pub mod config;
pub mod error;
pub(crate) mod writer;


pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use writer::LogFileWriter;

/// Install the global subscriber described by `config`.
///
/// Fails if the configuration is invalid, the log file cannot be opened, or
/// a global subscriber is already installed.
pub fn init_logger(config: LoggerConfig) -> Result<(), LoggerError> {
    config.validate()?;

    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    match (config.console.enabled, config.file.enabled) {
        (true, true) => init_both(&config, filter),
        (true, false) => init_console_only(&config.console, filter),
        (false, true) => init_file_only(&config.file, filter),
        (false, false) => Err(LoggerError::config(
            "At least one output (console or file) must be enabled",
        )),
    }
}

fn already_installed(e: impl std::fmt::Display) -> LoggerError {
    LoggerError::config(format!("Global subscriber already installed: {}", e))
}

fn init_console_only(config: &ConsoleConfig, filter: EnvFilter) -> Result<(), LoggerError> {
    let use_ansi = config.colored && std::io::stderr().is_terminal();

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(already_installed)
}

fn init_file_only(config: &FileConfig, filter: EnvFilter) -> Result<(), LoggerError> {
    let writer = LogFileWriter::new(config)?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Full => registry
            .with(fmt::layer().with_ansi(false).with_target(true).with_writer(writer))
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .compact()
                    .with_writer(writer),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().with_ansi(false).json().with_writer(writer))
            .try_init(),
    };

    result.map_err(already_installed)
}

fn init_both(config: &LoggerConfig, filter: EnvFilter) -> Result<(), LoggerError> {
    let use_ansi = config.console.colored && std::io::stderr().is_terminal();
    let writer = LogFileWriter::new(&config.file)?;

    // The file layer goes first: span fields are formatted by the first
    // layer, and ANSI codes from the console layer would leak into the file.
    // See https://github.com/tokio-rs/tracing/issues/1817
    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.file.format {
        LogFormat::Full => registry
            .with(fmt::layer().with_ansi(false).with_target(true).with_writer(writer))
            .with(
                fmt::layer()
                    .with_ansi(use_ansi)
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .compact()
                    .with_writer(writer),
            )
            .with(
                fmt::layer()
                    .with_ansi(use_ansi)
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().with_ansi(false).json().with_writer(writer))
            .with(
                fmt::layer()
                    .with_ansi(use_ansi)
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(already_installed)
}
