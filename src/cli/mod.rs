//! CLI module for geoportal-cache
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing with clap
//! - Configuration merging (CLI args + config files)
//! - Command handlers for fetch, info, purge and stats

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment, FetchTarget};

use anyhow::Context;

use crate::config::settings::Settings;
use crate::logger::init_logger;

/// Load and merge configuration from CLI arguments
///
/// 1. Load base configuration from files and environment variables
/// 2. Merge CLI argument overrides
/// 3. Validate the final configuration
pub fn load_and_merge_config(cli: &Cli) -> anyhow::Result<Settings> {
    let merger = ConfigurationMerger::from_sources(cli.config.as_deref(), cli.env.map(Into::into))
        .context("Configuration error")?;

    merger
        .merge_cli_args(cli)
        .context("Configuration merge error")
}

/// Install the global logger described by `settings`
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<()> {
    let logger_config = settings
        .logger
        .clone()
        .into_logger_config()
        .context("Logger configuration error")?;

    init_logger(logger_config).context("Logger initialization error")
}
